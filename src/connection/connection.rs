pub mod connection {
    use crate::model::epoch_millis;
    use crate::remote::{CallbackHandle, Directory, RemoteError, RemoteService, Resolver, NOT_REGISTERED};
    use crate::task::StopSignal;
    use log::{debug, info, log_enabled, warn, Level};
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::{Duration, Instant};
    use thiserror::Error;

    #[derive(Debug, Clone, PartialEq, Eq, Error)]
    pub enum ConnectionError {
        #[error("{0} already registered")]
        AlreadyRegistered(String),
        #[error("{0} not initialized yet")]
        NotInitialized(String),
        #[error("{0} unavailable")]
        Unavailable(String),
        #[error("unable to start the supervisor for {0}: {1}")]
        Spawn(String, String),
    }
    ///
    /// Where the supervisor is in its cycle.  HeartbeatOk and
    /// HeartbeatFail are connected states that record the outcome of
    /// the latest probe attempt.
    ///
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum SupervisorState {
        Disconnected,
        Connecting,
        Connected,
        HeartbeatOk,
        HeartbeatFail,
    }
    ///
    /// Supervisor timing.  The defaults are the production values.
    ///
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct SupervisorSettings {
        /// Connected iterations to run before the first heartbeat.
        pub warmup_iterations: u32,
        pub heartbeat_attempts: u32,
        pub heartbeat_spacing: Duration,
        pub reconnect_backoff: Duration,
        pub settle_ticks: u32,
        pub settle_tick: Duration,
        /// Heartbeat cycles longer than this are logged.
        pub slow_heartbeat: Duration,
    }

    impl Default for SupervisorSettings {
        fn default() -> SupervisorSettings {
            SupervisorSettings {
                warmup_iterations: 3,
                heartbeat_attempts: 3,
                heartbeat_spacing: Duration::from_secs(1),
                reconnect_backoff: Duration::from_secs(5),
                settle_ticks: 5,
                settle_tick: Duration::from_secs(1),
                slow_heartbeat: Duration::from_secs(30),
            }
        }
    }
    ///
    /// Told about every transition into the disconnected state so the
    /// rest of the process can treat work bound to the old connection
    /// as orphaned.
    ///
    pub trait DisconnectSink: Send + Sync {
        fn disconnected(&self, service: &str);
    }

    impl<F> DisconnectSink for F
    where
        F: Fn(&str) + Send + Sync,
    {
        fn disconnected(&self, service: &str) {
            self(service)
        }
    }
    ///
    /// Split a candidate host string.  Hosts may be separated by commas,
    /// semicolons or vertical bars; blanks are dropped.
    ///
    pub fn split_hosts(hosts: &str) -> Vec<String> {
        hosts
            .split(|c| c == ',' || c == ';' || c == '|')
            .map(|h| h.trim())
            .filter(|h| !h.is_empty())
            .map(String::from)
            .collect()
    }

    struct LinkState<S: ?Sized> {
        directory: Option<Arc<dyn Directory<S>>>,
        handle: Option<Arc<S>>,
        offset: Option<i64>,
        cursor: usize,
        state: SupervisorState,
        connected: bool,
        iterations: u32,
    }
    ///
    /// One supervised connection to a named remote service.  Build it
    /// with ```new``` and the ```with_*``` methods, then either
    /// ```start``` it directly or hand it to a ConnectionRegistry.
    ///
    pub struct ServiceConnection<S: RemoteService + ?Sized + 'static> {
        class_name: String,
        host_list: String,
        hosts: Vec<String>,
        port: u16,
        resolver: Arc<dyn Resolver<S>>,
        callback: Option<CallbackHandle>,
        settings: SupervisorSettings,
        on_disconnect: Option<Arc<dyn DisconnectSink>>,
        link: Mutex<LinkState<S>>,
        stop: StopSignal,
        disconnects: AtomicU64,
        slow_heartbeats: AtomicU64,
        supervisor: Mutex<Option<thread::JoinHandle<()>>>,
    }

    impl<S: RemoteService + ?Sized + 'static> ServiceConnection<S> {
        pub fn new(class_name: &str, hosts: &str, port: u16, resolver: Arc<dyn Resolver<S>>) -> ServiceConnection<S> {
            ServiceConnection {
                class_name: String::from(class_name),
                host_list: String::from(hosts),
                hosts: split_hosts(hosts),
                port,
                resolver,
                callback: None,
                settings: SupervisorSettings::default(),
                on_disconnect: None,
                link: Mutex::new(LinkState {
                    directory: None,
                    handle: None,
                    offset: None,
                    cursor: 0,
                    state: SupervisorState::Disconnected,
                    connected: false,
                    iterations: 0,
                }),
                stop: StopSignal::new(),
                disconnects: AtomicU64::new(0),
                slow_heartbeats: AtomicU64::new(0),
                supervisor: Mutex::new(None),
            }
        }
        /// Subscribe with this handle on every connect.
        pub fn with_callback(mut self, callback: CallbackHandle) -> ServiceConnection<S> {
            self.callback = Some(callback);
            self
        }
        pub fn with_settings(mut self, settings: SupervisorSettings) -> ServiceConnection<S> {
            self.settings = settings;
            self
        }
        pub fn on_disconnect(mut self, sink: Arc<dyn DisconnectSink>) -> ServiceConnection<S> {
            self.on_disconnect = Some(sink);
            self
        }
        ///
        /// Key under which the registry files this connection:
        /// service name, raw host string and port.
        ///
        pub fn key(&self) -> String {
            registry_key(&self.class_name, &self.host_list, self.port)
        }
        pub fn class_name(&self) -> &str {
            &self.class_name
        }
        pub fn hosts(&self) -> &[String] {
            &self.hosts
        }
        pub fn port(&self) -> u16 {
            self.port
        }
        ///
        /// Start the supervisor thread.  The supervisor holds its own
        /// reference and runs until ```shutdown```.
        ///
        pub fn start(self) -> Result<Arc<ServiceConnection<S>>, ConnectionError> {
            let connection = Arc::new(self);
            let runner = Arc::clone(&connection);
            debug!(
                "Starting supervisor for {}@{}:{}",
                connection.class_name, connection.host_list, connection.port
            );
            let handle = thread::Builder::new()
                .name(format!("supervisor-{}", connection.class_name))
                .spawn(move || runner.supervise())
                .map_err(|e| ConnectionError::Spawn(connection.class_name.clone(), e.to_string()))?;
            *connection.supervisor.lock() = Some(handle);
            Ok(connection)
        }
        ///
        /// Resolve the directory at ```host```, look the service up
        /// and, if we carry a callback handle, subscribe.  The clock
        /// offset becomes local time minus the remote time returned by
        /// subscribe.  Failures are returned, never retried here.
        ///
        pub fn connect(&self, host: &str) -> Result<(), RemoteError> {
            info!("Connecting to {} at {}:{}", self.class_name, host, self.port);
            let directory = self.resolver.resolve(host, self.port)?;
            if log_enabled!(Level::Debug) {
                match directory.list() {
                    Ok(names) => {
                        for name in names {
                            debug!("Bound in the directory: {}", name);
                        }
                    }
                    Err(e) => debug!("Unable to list the directory at {}: {}", host, e),
                }
            }
            let handle = directory.lookup(&self.class_name)?;
            let offset = match &self.callback {
                Some(callback) => {
                    let remote_now = handle.subscribe(callback)?;
                    Some(epoch_millis() - remote_now)
                }
                None => None,
            };
            {
                let mut link = self.link.lock();
                link.directory = Some(directory);
                link.handle = Some(handle);
                if offset.is_some() {
                    link.offset = offset;
                }
            }
            match offset {
                Some(offset) => info!("Connected (offset={})", offset),
                None => info!("Connected"),
            }
            Ok(())
        }
        ///
        /// The live remote handle.  Before the first successful connect
        /// this fails with NotInitialized.  After a disconnect the
        /// service is looked up again in the last directory resolved,
        /// failing with Unavailable if that does not work.
        ///
        pub fn get_handle(&self) -> Result<Arc<S>, ConnectionError> {
            let directory = {
                let link = self.link.lock();
                if let Some(handle) = &link.handle {
                    return Ok(Arc::clone(handle));
                }
                match &link.directory {
                    Some(directory) => Arc::clone(directory),
                    None => return Err(ConnectionError::NotInitialized(self.class_name.clone())),
                }
            };
            match directory.lookup(&self.class_name) {
                Ok(handle) => {
                    self.link.lock().handle = Some(Arc::clone(&handle));
                    Ok(handle)
                }
                Err(e) => {
                    debug!("Looking up {} again failed: {}", self.class_name, e);
                    Err(ConnectionError::Unavailable(self.class_name.clone()))
                }
            }
        }
        pub fn is_connected(&self) -> bool {
            self.link.lock().connected && !self.stop.is_stopped()
        }
        pub fn state(&self) -> SupervisorState {
            self.link.lock().state
        }
        /// Index just past the host last tried in the current cycle.
        pub fn cursor(&self) -> usize {
            self.link.lock().cursor
        }
        /// Local minus remote clock, once known.
        pub fn clock_offset(&self) -> Option<i64> {
            self.link.lock().offset
        }
        /// Current time on the remote's clock, as far as we know it.
        pub fn current_time_millis(&self) -> i64 {
            epoch_millis() - self.clock_offset().unwrap_or(0)
        }
        /// Transitions into the disconnected state so far.
        pub fn disconnect_count(&self) -> u64 {
            self.disconnects.load(Ordering::SeqCst)
        }
        /// Heartbeat attempts that ran past ```slow_heartbeat```.
        pub fn slow_heartbeat_count(&self) -> u64 {
            self.slow_heartbeats.load(Ordering::SeqCst)
        }
        ///
        /// Ask the supervisor to stop at its next safe point.  A connect
        /// or heartbeat call already in flight is not interrupted.
        ///
        pub fn shutdown(&self) {
            if !self.stop.is_stopped() {
                info!("Shutting down the supervisor for {}", self.class_name);
            }
            self.stop.stop();
        }
        pub fn is_shut_down(&self) -> bool {
            self.stop.is_stopped()
        }
        ///
        /// Wait for the supervisor thread to exit.  Must not be called
        /// from the supervisor thread itself.
        ///
        pub fn join(&self) {
            let handle = self.supervisor.lock().take();
            if let Some(handle) = handle {
                let _ = handle.join();
            }
        }

        // Supervisor thread body.

        fn supervise(self: Arc<Self>) {
            debug!("Supervisor for {} running", self.class_name);
            while !self.stop.is_stopped() {
                self.supervise_once();
            }
            self.link.lock().state = SupervisorState::Disconnected;
            info!("Supervisor for {} stopped", self.class_name);
        }

        fn supervise_once(&self) {
            self.connect_phase();
            let heartbeat_due = {
                let mut link = self.link.lock();
                if link.connected && !self.stop.is_stopped() {
                    let due = link.iterations > self.settings.warmup_iterations;
                    link.iterations = link.iterations.saturating_add(1);
                    due
                } else {
                    false
                }
            };
            if heartbeat_due {
                self.heartbeat_cycle();
            }
            let mut ticks = 0;
            while ticks < self.settings.settle_ticks && self.is_connected() {
                if !self.stop.sleep(self.settings.settle_tick) {
                    break;
                }
                ticks += 1;
            }
        }

        // Walk the host list from the top until one connects or we are
        // asked to stop.

        fn connect_phase(&self) {
            if self.hosts.is_empty() {
                warn!("{} has no candidate hosts", self.class_name);
                self.stop.sleep(self.settings.reconnect_backoff);
                return;
            }
            let mut index = 0;
            loop {
                if self.stop.is_stopped() || self.link.lock().connected {
                    return;
                }
                if index == self.hosts.len() {
                    index = 0;
                }
                let host = &self.hosts[index];
                index += 1;
                {
                    let mut link = self.link.lock();
                    link.state = SupervisorState::Connecting;
                    link.cursor = index;
                }
                match self.connect(host) {
                    Ok(()) => {
                        let mut link = self.link.lock();
                        link.connected = true;
                        link.iterations = 0;
                        link.state = SupervisorState::Connected;
                        return;
                    }
                    Err(e) if e.is_server_not_ready() => warn!(
                        "{} connection failed to {}:{} (server not ready?)",
                        self.class_name, host, self.port
                    ),
                    Err(e) => warn!(
                        "{} connection failed to {}:{}: {}",
                        self.class_name, host, self.port, e
                    ),
                }
                self.link.lock().state = SupervisorState::Disconnected;
                if !self.stop.sleep(self.settings.reconnect_backoff) {
                    return;
                }
            }
        }

        fn probe(&self) -> Result<i64, RemoteError> {
            let handle = self
                .get_handle()
                .map_err(|e| RemoteError::Fault(e.to_string()))?;
            let remote_time = match &self.callback {
                None => handle.is_available()?,
                Some(callback) => handle.is_registered(callback.root(), callback.service())?,
            };
            if remote_time > 0 || remote_time == NOT_REGISTERED {
                Ok(remote_time)
            } else {
                Err(RemoteError::InvalidRemoteTime(remote_time))
            }
        }

        fn heartbeat_cycle(&self) {
            let attempts = self.settings.heartbeat_attempts.max(1);
            for attempt in 1..=attempts {
                let start = Instant::now();
                let finished = match self.probe() {
                    Ok(NOT_REGISTERED) => {
                        warn!("Client not registered on {}? (will reconnect)", self.class_name);
                        self.drop_connection();
                        true
                    }
                    Ok(remote_time) => {
                        let mut link = self.link.lock();
                        link.offset = Some(epoch_millis() - remote_time);
                        link.state = SupervisorState::HeartbeatOk;
                        true
                    }
                    Err(e) => {
                        if e.is_server_not_ready() {
                            warn!(
                                "Sending alive message to {} (attempt {}) - {} down/restarted?",
                                self.class_name, attempt, self.class_name
                            );
                        } else {
                            warn!(
                                "Sending alive message to {} (attempt {}): {}",
                                self.class_name, attempt, e
                            );
                        }
                        self.link.lock().state = SupervisorState::HeartbeatFail;
                        if attempt == attempts {
                            self.drop_connection();
                            true
                        } else {
                            !self.stop.sleep(self.settings.heartbeat_spacing)
                        }
                    }
                };
                let duration = start.elapsed();
                if duration > self.settings.slow_heartbeat {
                    self.slow_heartbeats.fetch_add(1, Ordering::SeqCst);
                    warn!(
                        "{} heartbeat took {:?}{}",
                        self.class_name,
                        duration,
                        if self.link.lock().connected { "" } else { " (didn't succeed)" }
                    );
                }
                if finished {
                    break;
                }
            }
        }

        // Transition into Disconnected.  Only the call that actually
        // flips the state notifies the sink.

        fn drop_connection(&self) {
            {
                let mut link = self.link.lock();
                if !link.connected {
                    return;
                }
                link.connected = false;
                link.handle = None;
                link.state = SupervisorState::Disconnected;
            }
            self.disconnects.fetch_add(1, Ordering::SeqCst);
            info!("{} disconnected", self.class_name);
            if let Some(sink) = &self.on_disconnect {
                sink.disconnected(&self.class_name);
            }
        }
    }
    ///
    /// The registry key for a service name, raw host string and port.
    ///
    pub fn registry_key(class_name: &str, hosts: &str, port: u16) -> String {
        format!("{}@{}:{}", class_name, hosts, port)
    }


    #[cfg(test)]
    mod connection_test {
        use super::testing::*;
        use super::*;
        use std::sync::atomic::AtomicUsize;

        fn connection(hosts: &str, resolver: Arc<FakeResolver>) -> ServiceConnection<ScriptedService> {
            ServiceConnection::new("Scripted", hosts, 600, resolver).with_settings(fast_settings())
        }

        #[test]
        fn hosts_split_on_any_separator() {
            assert_eq!(vec!["a", "b", "c", "d"], split_hosts("a,b;c | d"));
            assert!(split_hosts(" , ").is_empty());
        }
        #[test]
        fn handle_not_initialized_before_connect() {
            let service = Arc::new(ScriptedService::healthy());
            let resolver = Arc::new(FakeResolver::new(&[], service));
            let connection = connection("a", resolver);
            assert_eq!(
                Err(ConnectionError::NotInitialized(String::from("Scripted"))),
                connection.get_handle().map(|_| ())
            );
            assert!(!connection.is_connected());
        }
        #[test]
        fn unreachable_hosts_never_connect() {
            let service = Arc::new(ScriptedService::healthy());
            let resolver = Arc::new(FakeResolver::new(&[], service));
            let connection = connection("a,b", resolver.clone()).start().unwrap();
            let mut observed_connected = false;
            let deadline = Instant::now() + Duration::from_millis(100);
            while Instant::now() < deadline {
                observed_connected |= connection.is_connected();
                thread::sleep(Duration::from_millis(1));
            }
            connection.shutdown();
            connection.join();
            assert!(!observed_connected);
            assert!(resolver.attempts().len() >= 4);
            assert_eq!(0, connection.disconnect_count());
            assert!(connection.get_handle().is_err());
        }
        #[test]
        fn fails_over_to_second_host() {
            let service = Arc::new(ScriptedService::healthy());
            let resolver = Arc::new(FakeResolver::new(&["b"], service));
            let connection = connection("a,b", resolver.clone()).start().unwrap();
            assert!(wait_for(Duration::from_secs(5), || connection.is_connected()));
            assert_eq!(2, connection.cursor());
            assert_eq!(vec!["a", "b"], resolver.attempts()[..2].to_vec());
            assert!(connection.get_handle().is_ok());
            connection.shutdown();
            connection.join();
            assert!(!connection.is_connected());
        }
        #[test]
        fn reconnect_cycle_restarts_from_first_host() {
            let service = Arc::new(ScriptedService::healthy());
            service.answers.lock().push_back(Ok(NOT_REGISTERED));
            let resolver = Arc::new(FakeResolver::new(&["b"], service.clone()));
            let connection = connection("a,b", resolver.clone()).start().unwrap();
            assert!(wait_for(Duration::from_secs(5), || connection.disconnect_count() == 1
                && connection.is_connected()));
            connection.shutdown();
            connection.join();
            let attempts = resolver.attempts();
            assert_eq!(vec!["a", "b", "a", "b"], attempts[..4].to_vec());
        }
        #[test]
        fn three_failed_heartbeats_disconnect_once() {
            let service = Arc::new(ScriptedService::failing());
            let resolver = Arc::new(FakeResolver::new(&["a"], service.clone()));
            resolver.budget.store(1, Ordering::SeqCst);
            let notified = Arc::new(AtomicUsize::new(0));
            let counter = notified.clone();
            let connection = connection("a", resolver.clone())
                .on_disconnect(Arc::new(move |service: &str| {
                    assert_eq!("Scripted", service);
                    counter.fetch_add(1, Ordering::SeqCst);
                }))
                .start()
                .unwrap();
            assert!(wait_for(Duration::from_secs(5), || connection.disconnect_count() == 1));
            // Reconnects keep failing, so no further transitions happen.
            thread::sleep(Duration::from_millis(50));
            connection.shutdown();
            connection.join();
            assert_eq!(1, notified.load(Ordering::SeqCst));
            assert_eq!(1, connection.disconnect_count());
            assert_eq!(3, service.probes.load(Ordering::SeqCst));
            assert!(!connection.is_connected());
        }
        #[test]
        fn recovered_heartbeat_keeps_connection() {
            let service = Arc::new(ScriptedService::healthy());
            {
                let mut answers = service.answers.lock();
                answers.push_back(Err(RemoteError::NoSuchObject(String::from("x"))));
                answers.push_back(Ok(0));
            }
            let resolver = Arc::new(FakeResolver::new(&["a"], service.clone()));
            let connection = connection("a", resolver).start().unwrap();
            assert!(wait_for(Duration::from_secs(5), || {
                service.probes.load(Ordering::SeqCst) >= 3
            }));
            assert!(wait_for(Duration::from_secs(5), || {
                connection.state() == SupervisorState::HeartbeatOk
            }));
            connection.shutdown();
            connection.join();
            assert_eq!(0, connection.disconnect_count());
        }
        #[test]
        fn slow_heartbeats_are_counted() {
            let service = Arc::new(ScriptedService::healthy());
            let resolver = Arc::new(FakeResolver::new(&["a"], service.clone()));
            let settings = SupervisorSettings {
                slow_heartbeat: Duration::from_millis(0),
                ..fast_settings()
            };
            let connection = ServiceConnection::new("Scripted", "a", 600, resolver)
                .with_settings(settings)
                .start()
                .unwrap();
            assert!(wait_for(Duration::from_secs(5), || connection.slow_heartbeat_count() >= 2));
            connection.shutdown();
            connection.join();
            assert_eq!(0, connection.disconnect_count());
        }
        #[test]
        fn prompt_heartbeats_are_not_slow() {
            let service = Arc::new(ScriptedService::healthy());
            let resolver = Arc::new(FakeResolver::new(&["a"], service.clone()));
            let connection = connection("a", resolver).start().unwrap();
            assert!(wait_for(Duration::from_secs(5), || service.probes.load(Ordering::SeqCst) >= 3));
            connection.shutdown();
            connection.join();
            assert_eq!(0, connection.slow_heartbeat_count());
        }
        #[test]
        fn settle_delay_spaces_heartbeats() {
            let service = Arc::new(ScriptedService::healthy());
            let resolver = Arc::new(FakeResolver::new(&["a"], service.clone()));
            // One heartbeat per 5 x 20ms of settling.
            let settings = SupervisorSettings {
                settle_ticks: 5,
                settle_tick: Duration::from_millis(20),
                ..fast_settings()
            };
            let connection = ServiceConnection::new("Scripted", "a", 600, resolver)
                .with_settings(settings)
                .start()
                .unwrap();
            assert!(wait_for(Duration::from_secs(5), || service.probes.load(Ordering::SeqCst) >= 1));
            let before = service.probes.load(Ordering::SeqCst);
            thread::sleep(Duration::from_millis(400));
            let during = service.probes.load(Ordering::SeqCst) - before;
            connection.shutdown();
            connection.join();
            assert!(during <= 5, "{} heartbeats in 400ms", during);
            assert!(during >= 1, "no heartbeat in 400ms");
        }
        #[test]
        fn not_registered_disconnects_after_one_probe() {
            let service = Arc::new(ScriptedService::failing());
            service.answers.lock().push_back(Ok(NOT_REGISTERED));
            let resolver = Arc::new(FakeResolver::new(&["a"], service.clone()));
            resolver.budget.store(1, Ordering::SeqCst);
            let connection = connection("a", resolver)
                .with_callback(CallbackHandle::new("root", "mover"))
                .start()
                .unwrap();
            assert!(wait_for(Duration::from_secs(5), || connection.disconnect_count() == 1));
            connection.shutdown();
            connection.join();
            assert_eq!(1, service.probes.load(Ordering::SeqCst));
        }
        #[test]
        fn subscribe_sets_clock_offset() {
            let mut scripted = ScriptedService::healthy();
            scripted.subscribe_time = epoch_millis() - 10_000;
            let service = Arc::new(scripted);
            *service.fallback.lock() = Ok(i64::MAX / 2);
            let resolver = Arc::new(FakeResolver::new(&["a"], service.clone()));
            let connection = connection("a", resolver)
                .with_settings(SupervisorSettings {
                    warmup_iterations: 1000,
                    ..fast_settings()
                })
                .with_callback(CallbackHandle::new("root", "mover"))
                .start()
                .unwrap();
            assert!(wait_for(Duration::from_secs(5), || connection.is_connected()));
            let offset = connection.clock_offset().unwrap();
            assert!(offset >= 10_000 && offset < 20_000);
            assert_eq!(1, service.subscribes.load(Ordering::SeqCst));
            let remote_now = connection.current_time_millis();
            assert!(epoch_millis() - remote_now >= 10_000);
            connection.shutdown();
            connection.join();
        }
        #[test]
        fn handle_unavailable_after_disconnect() {
            let service = Arc::new(ScriptedService::failing());
            let resolver = Arc::new(FakeResolver::new(&["a"], service.clone()));
            resolver.budget.store(1, Ordering::SeqCst);
            let connection = ServiceConnection::new("Scripted", "a", 600, resolver.clone());
            connection.connect("a").unwrap();
            {
                let mut link = connection.link.lock();
                link.connected = true;
                link.directory = Some(Arc::new(FakeDirectory {
                    service: service.clone(),
                    bound: false,
                }));
            }
            connection.drop_connection();
            connection.drop_connection();
            assert_eq!(1, connection.disconnect_count());
            assert_eq!(
                Err(ConnectionError::Unavailable(String::from("Scripted"))),
                connection.get_handle().map(|_| ())
            );
        }
        #[test]
        fn shutdown_stops_a_sleeping_supervisor() {
            let service = Arc::new(ScriptedService::healthy());
            let resolver = Arc::new(FakeResolver::new(&[], service));
            let connection = ServiceConnection::new("Scripted", "a", 600, resolver)
                .with_settings(SupervisorSettings {
                    reconnect_backoff: Duration::from_secs(3600),
                    ..fast_settings()
                })
                .start()
                .unwrap();
            thread::sleep(Duration::from_millis(20));
            let start = Instant::now();
            connection.shutdown();
            connection.join();
            assert!(start.elapsed() < Duration::from_secs(5));
            assert!(connection.is_shut_down());
        }
    }
}
