pub mod client {
    use crate::channel::{CancelToken, CancellableChannel, Watchdog};
    use crate::model::*;
    use crate::remote::*;
    use crate::wire::protocol::protocol::*;
    use log::{debug, info, warn};
    use parking_lot::Mutex;
    use serde::de::DeserializeOwned;
    use std::collections::HashMap;
    use std::io::{self, BufReader};
    use std::net::{TcpStream, ToSocketAddrs};
    use std::sync::Arc;
    use std::thread;
    use std::time::{Duration, Instant};

    type Stream = BufReader<CancellableChannel<TcpStream, CancelToken>>;

    /// Default limit on one request/reply exchange.
    pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(60);
    /// Default limit on establishing a TCP connection.
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    // Where to connect and how long to wait.  Shared by a resolver, the
    // directories it hands out and the services looked up in them.

    #[derive(Clone)]
    struct Endpoint {
        host: String,
        port: u16,
        connect_timeout: Duration,
        call_timeout: Duration,
        watchdog: Option<Arc<Watchdog>>,
    }

    impl Endpoint {
        fn open(&self) -> Result<(Stream, CancelToken), RemoteError> {
            let mut last_error = None;
            for address in (self.host.as_str(), self.port).to_socket_addrs()? {
                match TcpStream::connect_timeout(&address, self.connect_timeout) {
                    Ok(stream) => {
                        stream.set_nodelay(true)?;
                        let token = CancelToken::new();
                        token.bind(Arc::new(stream.try_clone()?));
                        if let Some(watchdog) = &self.watchdog {
                            watchdog.watch(&token);
                        }
                        let channel = CancellableChannel::new(stream, token.clone());
                        return Ok((BufReader::new(channel), token));
                    }
                    Err(e) => {
                        debug!("Connecting to {} failed: {}", address, e);
                        last_error = Some(e);
                    }
                }
            }
            Err(RemoteError::Io(last_error.unwrap_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("{} does not resolve to any address", self.host),
                )
            })))
        }
    }

    // Send one request and wait for its reply, all under the call
    // deadline.

    fn exchange(stream: &mut Stream, token: &CancelToken, timeout: Duration, request: &Request) -> Result<Reply, RemoteError> {
        token.set_deadline(Some(Instant::now() + timeout));
        let result = write_message(stream.get_mut(), request).and_then(|_| match read_message::<_, Reply>(stream)? {
            Some(reply) => Ok(reply),
            None => Err(RemoteError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "master closed the connection",
            ))),
        });
        token.set_deadline(None);
        result
    }
    ///
    /// One request/reply connection.  Calls on it are serialised.  Once
    /// its token has been cancelled (by the watchdog, typically) every
    /// further call fails and a new session has to be resolved.
    ///
    struct Session {
        peer: String,
        token: CancelToken,
        call_timeout: Duration,
        stream: Mutex<Stream>,
    }

    impl Session {
        fn open(endpoint: &Endpoint) -> Result<Session, RemoteError> {
            let (stream, token) = endpoint.open()?;
            Ok(Session {
                peer: format!("{}:{}", endpoint.host, endpoint.port),
                token,
                call_timeout: endpoint.call_timeout,
                stream: Mutex::new(stream),
            })
        }
        fn request(&self, request: &Request) -> Result<Reply, RemoteError> {
            let mut stream = self.stream.lock();
            exchange(&mut stream, &self.token, self.call_timeout, request)
        }
    }

    impl Drop for Session {
        fn drop(&mut self) {
            debug!("Closing session with {}", self.peer);
            let _ = self.stream.get_mut().get_mut().close();
        }
    }
    ///
    /// Resolves master directories over TCP.
    ///
    /// ```rust,no_run
    /// use masterlink::remote::{Directory, RemoteService, Resolver};
    /// use masterlink::wire::TcpResolver;
    /// use std::time::Duration;
    ///
    /// let resolver = TcpResolver::new(Duration::from_secs(30));
    /// let directory = resolver.resolve("master.example.org", 6601).unwrap();
    /// let master = directory.lookup("Master").unwrap();
    /// println!("remote time {}", master.is_available().unwrap());
    /// ```
    ///
    pub struct TcpResolver {
        call_timeout: Duration,
        connect_timeout: Duration,
        watchdog: Option<Arc<Watchdog>>,
    }

    impl TcpResolver {
        pub fn new(call_timeout: Duration) -> TcpResolver {
            TcpResolver {
                call_timeout,
                connect_timeout: DEFAULT_CONNECT_TIMEOUT,
                watchdog: None,
            }
        }
        pub fn with_connect_timeout(mut self, timeout: Duration) -> TcpResolver {
            self.connect_timeout = timeout;
            self
        }
        /// Call deadlines are only enforced when a watchdog is attached.
        pub fn with_watchdog(mut self, watchdog: Arc<Watchdog>) -> TcpResolver {
            self.watchdog = Some(watchdog);
            self
        }
    }

    impl Default for TcpResolver {
        fn default() -> TcpResolver {
            TcpResolver::new(DEFAULT_CALL_TIMEOUT)
        }
    }

    impl Resolver<dyn MasterService> for TcpResolver {
        fn resolve(&self, host: &str, port: u16) -> Result<Arc<dyn Directory<dyn MasterService>>, RemoteError> {
            let endpoint = Endpoint {
                host: String::from(host),
                port,
                connect_timeout: self.connect_timeout,
                call_timeout: self.call_timeout,
                watchdog: self.watchdog.clone(),
            };
            let session = Arc::new(Session::open(&endpoint)?);
            Ok(Arc::new(TcpDirectory { endpoint, session }))
        }
    }

    struct TcpDirectory {
        endpoint: Endpoint,
        session: Arc<Session>,
    }

    impl Directory<dyn MasterService> for TcpDirectory {
        fn list(&self) -> Result<Vec<String>, RemoteError> {
            self.session.request(&Request::List)?.into_result()
        }
        fn lookup(&self, name: &str) -> Result<Arc<dyn MasterService>, RemoteError> {
            self.session
                .request(&Request::Lookup {
                    name: String::from(name),
                })?
                .into_result::<bool>()?;
            Ok(Arc::new(TcpMasterService {
                service: String::from(name),
                endpoint: self.endpoint.clone(),
                session: Arc::clone(&self.session),
                listener: Mutex::new(None),
            }))
        }
    }

    // The push stream of a subscribed client.  Dropping it cancels the
    // stream, which ends the listener thread.

    struct PushListener {
        token: CancelToken,
    }

    impl Drop for PushListener {
        fn drop(&mut self) {
            self.token.cancel();
        }
    }

    fn listen(stream: &mut Stream, sink: Arc<dyn PushSink>, service: &str) {
        loop {
            match read_message::<_, Notification>(stream) {
                Ok(Some(notification)) => sink.notify(notification),
                Ok(None) => {
                    info!("Push stream from {} closed", service);
                    break;
                }
                Err(RemoteError::Io(e)) if e.kind() == io::ErrorKind::ConnectionAborted => {
                    debug!("Push stream from {} cancelled", service);
                    break;
                }
                Err(e) => {
                    warn!("Push stream from {} failed: {}", service, e);
                    break;
                }
            }
        }
    }
    ///
    /// A MasterService bound in a TcpDirectory.  Calls travel on the
    /// directory's session; a subscribe carrying a sink also opens a
    /// push stream on its own connection.
    ///
    pub struct TcpMasterService {
        service: String,
        endpoint: Endpoint,
        session: Arc<Session>,
        listener: Mutex<Option<PushListener>>,
    }

    impl TcpMasterService {
        pub fn service(&self) -> &str {
            &self.service
        }
        fn call<T: DeserializeOwned>(&self, call: Call) -> Result<T, RemoteError> {
            self.session
                .request(&Request::Call {
                    service: self.service.clone(),
                    call,
                })?
                .into_result()
        }
        fn start_listener(&self, client: &CallbackHandle, sink: Arc<dyn PushSink>) -> Result<(), RemoteError> {
            let (mut stream, token) = self.endpoint.open()?;
            let request = Request::Listen {
                service: self.service.clone(),
                root: String::from(client.root()),
                client: String::from(client.service()),
            };
            exchange(&mut stream, &token, self.endpoint.call_timeout, &request)?.into_result::<()>()?;
            let service = self.service.clone();
            thread::Builder::new()
                .name(format!("push-{}", self.service))
                .spawn(move || listen(&mut stream, sink, &service))?;
            // Replacing an older listener cancels it.
            *self.listener.lock() = Some(PushListener { token });
            debug!("Listening for pushes from {}", self.service);
            Ok(())
        }
    }

    impl RemoteService for TcpMasterService {
        fn subscribe(&self, client: &CallbackHandle) -> Result<i64, RemoteError> {
            let remote_now = self.call(Call::Subscribe {
                root: String::from(client.root()),
                client: String::from(client.service()),
            })?;
            if let Some(sink) = client.sink() {
                self.start_listener(client, sink)?;
            }
            Ok(remote_now)
        }
        fn is_available(&self) -> Result<i64, RemoteError> {
            self.call(Call::IsAvailable)
        }
        fn is_registered(&self, root: &str, service: &str) -> Result<i64, RemoteError> {
            self.call(Call::IsRegistered {
                root: String::from(root),
                client: String::from(service),
            })
        }
    }

    impl MasterService for TcpMasterService {
        fn get_destination_caches(&self) -> Result<HashMap<String, DestinationCache>, RemoteError> {
            self.call(Call::GetDestinationCaches)
        }
        fn get_destination_scheduler_cache(&self, name: &str) -> Result<SchedulerCache, RemoteError> {
            self.call(Call::GetDestinationSchedulerCache {
                name: String::from(name),
            })
        }
        fn restart_destination(&self, name: &str, graceful: bool) -> Result<SchedulerCache, RemoteError> {
            self.call(Call::RestartDestination {
                name: String::from(name),
                graceful,
            })
        }
        fn update_host(&self, host: &Host) -> Result<(), RemoteError> {
            self.call(Call::UpdateHost { host: host.clone() })
        }
        fn remove_destination(&self, name: &str) -> Result<(), RemoteError> {
            self.call(Call::RemoveDestination {
                name: String::from(name),
            })
        }
        fn get_destination(&self, name: &str) -> Result<Destination, RemoteError> {
            self.call(Call::GetDestination {
                name: String::from(name),
            })
        }
        fn get_association(&self, destination: &str, host: &str) -> Result<Association, RemoteError> {
            self.call(Call::GetAssociation {
                destination: String::from(destination),
                host: String::from(host),
            })
        }
        fn get_user(&self, name: &str) -> Result<AccountingUser, RemoteError> {
            self.call(Call::GetUser {
                name: String::from(name),
            })
        }
        fn get_bad_data_transfers_count(&self, destination: &str) -> Result<u32, RemoteError> {
            self.call(Call::GetBadDataTransfersCount {
                destination: String::from(destination),
            })
        }
        fn get_cat_urls(&self) -> Result<Vec<CatUrl>, RemoteError> {
            self.call(Call::GetCatUrls)
        }
        fn get_transfer_groups(&self) -> Result<Vec<TransferGroup>, RemoteError> {
            self.call(Call::GetTransferGroups)
        }
        fn get_transfer_servers(&self, group: &str) -> Result<Vec<TransferServer>, RemoteError> {
            self.call(Call::GetTransferServers {
                group: String::from(group),
            })
        }
        fn get_rate_statistics(&self, destination: &str) -> Result<RateStatistics, RemoteError> {
            self.call(Call::GetRateStatistics {
                destination: String::from(destination),
            })
        }
    }

}
