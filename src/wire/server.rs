pub mod server {
    use crate::remote::*;
    use crate::task::StopSignal;
    use crate::wire::protocol::protocol::*;
    use log::{debug, info, warn};
    use parking_lot::{Mutex, RwLock};
    use std::collections::HashMap;
    use std::io::{self, BufReader, Write};
    use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    // How often the acceptor checks for a stop request.
    const ACCEPT_POLL: Duration = Duration::from_millis(20);

    // A push stream handed over by a client's listen request.

    struct PushStream {
        service: String,
        client: String,
        stream: TcpStream,
    }

    #[derive(Default)]
    struct Shared {
        services: RwLock<HashMap<String, Arc<dyn MasterService>>>,
        listeners: Mutex<Vec<PushStream>>,
        clients: Mutex<HashMap<u64, TcpStream>>,
        next_client: AtomicU64,
    }
    ///
    /// Serves MasterService implementations to TcpResolver clients.
    /// Each accepted connection gets its own thread; requests on one
    /// connection are answered in order.
    ///
    /// Services can be bound and unbound while the server runs.  Calls
    /// to a service that has been unbound fail with NoSuchObject, which
    /// clients treat as "the master restarted".
    ///
    pub struct MasterServer {
        address: SocketAddr,
        shared: Arc<Shared>,
        stop: StopSignal,
        acceptor: Mutex<Option<thread::JoinHandle<()>>>,
    }

    impl MasterServer {
        ///
        /// Bind ```address``` (port 0 picks a free port) and start
        /// accepting connections.
        ///
        pub fn bind(address: &str) -> io::Result<MasterServer> {
            let listener = TcpListener::bind(address)?;
            listener.set_nonblocking(true)?;
            let address = listener.local_addr()?;
            let shared = Arc::new(Shared::default());
            let stop = StopSignal::new();

            let thread_shared = Arc::clone(&shared);
            let thread_stop = stop.clone();
            let acceptor = thread::Builder::new()
                .name(String::from("master-acceptor"))
                .spawn(move || accept_loop(listener, thread_shared, thread_stop))?;
            info!("Master server listening on {}", address);
            Ok(MasterServer {
                address,
                shared,
                stop,
                acceptor: Mutex::new(Some(acceptor)),
            })
        }
        pub fn local_addr(&self) -> SocketAddr {
            self.address
        }
        /// Bind ```service``` under ```name```, replacing any previous binding.
        pub fn register(&self, name: &str, service: Arc<dyn MasterService>) {
            self.shared
                .services
                .write()
                .insert(String::from(name), service);
        }
        pub fn unregister(&self, name: &str) -> bool {
            self.shared.services.write().remove(name).is_some()
        }
        pub fn listener_count(&self) -> usize {
            self.shared.listeners.lock().len()
        }
        /// Request/reply connections currently being served.
        pub fn client_count(&self) -> usize {
            self.shared.clients.lock().len()
        }
        ///
        /// Write ```notification``` to every client listening to
        /// ```service```.  Listeners whose stream fails are dropped.
        /// Returns the number of listeners reached.
        ///
        pub fn broadcast(&self, service: &str, notification: &Notification) -> usize {
            let mut line = match serde_json::to_vec(notification) {
                Ok(line) => line,
                Err(e) => {
                    warn!("Unable to encode notification: {}", e);
                    return 0;
                }
            };
            line.push(b'\n');
            let mut reached = 0;
            self.shared.listeners.lock().retain(|listener| {
                if listener.service != service {
                    return true;
                }
                let mut stream = &listener.stream;
                match stream.write_all(&line).and_then(|_| stream.flush()) {
                    Ok(()) => {
                        reached += 1;
                        true
                    }
                    Err(e) => {
                        info!("Dropping push stream of {}: {}", listener.client, e);
                        false
                    }
                }
            });
            reached
        }
        ///
        /// Stop accepting, close every client connection and wait for
        /// the acceptor to exit.
        ///
        pub fn stop(&self) {
            self.stop.stop();
            if let Some(handle) = self.acceptor.lock().take() {
                let _ = handle.join();
            }
            for (_, stream) in self.shared.clients.lock().drain() {
                let _ = stream.shutdown(Shutdown::Both);
            }
            for listener in self.shared.listeners.lock().drain(..) {
                let _ = listener.stream.shutdown(Shutdown::Both);
            }
            info!("Master server on {} stopped", self.address);
        }
    }

    impl Drop for MasterServer {
        fn drop(&mut self) {
            if !self.stop.is_stopped() {
                self.stop();
            }
        }
    }

    fn accept_loop(listener: TcpListener, shared: Arc<Shared>, stop: StopSignal) {
        loop {
            match listener.accept() {
                Ok((stream, peer)) => {
                    debug!("Connection from {}", peer);
                    if let Err(e) = start_client(stream, peer, &shared) {
                        warn!("Unable to serve {}: {}", peer, e);
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                    if !stop.sleep(ACCEPT_POLL) {
                        break;
                    }
                }
                Err(e) => {
                    warn!("Accept failed: {}", e);
                    if !stop.sleep(ACCEPT_POLL) {
                        break;
                    }
                }
            }
        }
    }

    fn start_client(stream: TcpStream, peer: SocketAddr, shared: &Arc<Shared>) -> io::Result<()> {
        // Accepted sockets may inherit the listener's non-blocking mode.
        stream.set_nonblocking(false)?;
        stream.set_nodelay(true)?;
        let id = shared.next_client.fetch_add(1, Ordering::SeqCst);
        shared.clients.lock().insert(id, stream.try_clone()?);
        let thread_shared = Arc::clone(shared);
        let spawned = thread::Builder::new()
            .name(format!("master-client-{}", peer))
            .spawn(move || {
                if let Err(e) = serve_client(stream, &thread_shared) {
                    debug!("Client {} ended: {}", peer, e);
                }
                thread_shared.clients.lock().remove(&id);
            });
        if let Err(e) = spawned {
            shared.clients.lock().remove(&id);
            return Err(e);
        }
        Ok(())
    }

    fn serve_client(stream: TcpStream, shared: &Shared) -> Result<(), RemoteError> {
        let mut reader = BufReader::new(stream.try_clone()?);
        let mut writer = stream;
        while let Some(request) = read_message::<_, Request>(&mut reader)? {
            let reply = match request {
                Request::List => {
                    let mut names: Vec<String> = shared.services.read().keys().cloned().collect();
                    names.sort();
                    Reply::from_result(Ok(names))
                }
                Request::Lookup { name } => {
                    let bound = shared.services.read().contains_key(&name);
                    Reply::from_result(if bound {
                        Ok(true)
                    } else {
                        Err(RemoteError::NotBound(name))
                    })
                }
                Request::Call { service, call } => {
                    let target = shared.services.read().get(&service).cloned();
                    match target {
                        Some(target) => dispatch(target.as_ref(), call),
                        None => Reply::from_result::<()>(Err(RemoteError::NoSuchObject(service))),
                    }
                }
                Request::Listen {
                    service,
                    root,
                    client,
                } => {
                    if !shared.services.read().contains_key(&service) {
                        Reply::from_result::<()>(Err(RemoteError::NotBound(service)))
                    } else {
                        // The connection now belongs to the push side.
                        // Broadcasts hold the listeners lock, so the
                        // reply is the first line the client sees.
                        info!("{}/{} listening for pushes from {}", root, client, service);
                        let push = writer.try_clone()?;
                        let mut listeners = shared.listeners.lock();
                        write_message(&mut writer, &Reply::Ok(serde_json::Value::Null))?;
                        listeners.push(PushStream {
                            service,
                            client: format!("{}/{}", root, client),
                            stream: push,
                        });
                        return Ok(());
                    }
                }
            };
            write_message(&mut writer, &reply)?;
        }
        Ok(())
    }
    ///
    /// Run one call against a service and package the result.
    ///
    pub fn dispatch(service: &dyn MasterService, call: Call) -> Reply {
        match call {
            Call::Subscribe { root, client } => {
                Reply::from_result(service.subscribe(&CallbackHandle::new(&root, &client)))
            }
            Call::IsAvailable => Reply::from_result(service.is_available()),
            Call::IsRegistered { root, client } => Reply::from_result(service.is_registered(&root, &client)),
            Call::GetDestinationCaches => Reply::from_result(service.get_destination_caches()),
            Call::GetDestinationSchedulerCache { name } => {
                Reply::from_result(service.get_destination_scheduler_cache(&name))
            }
            Call::RestartDestination { name, graceful } => {
                Reply::from_result(service.restart_destination(&name, graceful))
            }
            Call::UpdateHost { host } => Reply::from_result(service.update_host(&host)),
            Call::RemoveDestination { name } => Reply::from_result(service.remove_destination(&name)),
            Call::GetDestination { name } => Reply::from_result(service.get_destination(&name)),
            Call::GetAssociation { destination, host } => {
                Reply::from_result(service.get_association(&destination, &host))
            }
            Call::GetUser { name } => Reply::from_result(service.get_user(&name)),
            Call::GetBadDataTransfersCount { destination } => {
                Reply::from_result(service.get_bad_data_transfers_count(&destination))
            }
            Call::GetCatUrls => Reply::from_result(service.get_cat_urls()),
            Call::GetTransferGroups => Reply::from_result(service.get_transfer_groups()),
            Call::GetTransferServers { group } => Reply::from_result(service.get_transfer_servers(&group)),
            Call::GetRateStatistics { destination } => {
                Reply::from_result(service.get_rate_statistics(&destination))
            }
        }
    }


}
