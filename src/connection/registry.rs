pub mod registry {
    use crate::connection::{ConnectionError, ServiceConnection};
    use crate::remote::RemoteService;
    use log::{debug, info};
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::Arc;

    ///
    /// What the registry needs to know about a connection, whatever
    /// service type it talks to.
    ///
    pub trait Supervised: Send + Sync {
        fn class_name(&self) -> &str;
        fn is_connected(&self) -> bool;
        fn shutdown(&self);
    }

    impl<S: RemoteService + ?Sized + 'static> Supervised for ServiceConnection<S> {
        fn class_name(&self) -> &str {
            ServiceConnection::class_name(self)
        }
        fn is_connected(&self) -> bool {
            ServiceConnection::is_connected(self)
        }
        fn shutdown(&self) {
            ServiceConnection::shutdown(self)
        }
    }
    ///
    /// Process-wide table of supervised connections, one per
    /// (service, hosts, port) key.  Built once by the composition root
    /// and passed to whatever needs to open connections.
    ///
    #[derive(Default)]
    pub struct ConnectionRegistry {
        connections: Mutex<HashMap<String, Arc<dyn Supervised>>>,
    }

    impl ConnectionRegistry {
        pub fn new() -> ConnectionRegistry {
            ConnectionRegistry::default()
        }
        ///
        /// Start ```connection```'s supervisor and file it under its
        /// key.  If the key is taken and ```replace``` is false this
        /// fails with AlreadyRegistered and nothing is started.  With
        /// ```replace``` the previous connection is shut down.
        ///
        pub fn register<S>(
            &self,
            connection: ServiceConnection<S>,
            replace: bool,
        ) -> Result<Arc<ServiceConnection<S>>, ConnectionError>
        where
            S: RemoteService + ?Sized + 'static,
        {
            let key = connection.key();
            let mut connections = self.connections.lock();
            if !replace && connections.contains_key(&key) {
                return Err(ConnectionError::AlreadyRegistered(String::from(
                    connection.class_name(),
                )));
            }
            debug!("Registering supervisor for {}", key);
            let started = connection.start()?;
            let supervised: Arc<dyn Supervised> = started.clone();
            if let Some(previous) = connections.insert(key.clone(), supervised) {
                info!("{} replaced; shutting the previous supervisor down", key);
                previous.shutdown();
            }
            Ok(started)
        }
        pub fn get(&self, key: &str) -> Option<Arc<dyn Supervised>> {
            self.connections.lock().get(key).cloned()
        }
        pub fn len(&self) -> usize {
            self.connections.lock().len()
        }
        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }
        /// (key, connected) for every registered connection, sorted by key.
        pub fn statuses(&self) -> Vec<(String, bool)> {
            let mut result: Vec<(String, bool)> = self
                .connections
                .lock()
                .iter()
                .map(|(key, connection)| (key.clone(), connection.is_connected()))
                .collect();
            result.sort();
            result
        }
        pub fn shutdown_all(&self) {
            for connection in self.connections.lock().values() {
                connection.shutdown();
            }
        }
    }

    #[cfg(test)]
    mod registry_test {
        use super::*;
        use crate::connection::testing::*;
        use crate::connection::registry_key;
        use std::time::Duration;

        fn build(resolver: &Arc<FakeResolver>) -> ServiceConnection<ScriptedService> {
            ServiceConnection::new("Scripted", "a,b", 600, resolver.clone()).with_settings(fast_settings())
        }

        #[test]
        fn duplicate_key_rejected_without_replace() {
            let resolver = Arc::new(FakeResolver::new(&["a"], Arc::new(ScriptedService::healthy())));
            let registry = ConnectionRegistry::new();
            let first = registry.register(build(&resolver), false).unwrap();
            let second = registry.register(build(&resolver), false);
            assert_eq!(
                Some(ConnectionError::AlreadyRegistered(String::from("Scripted"))),
                second.err()
            );
            assert_eq!(1, registry.len());
            assert!(!first.is_shut_down());
            registry.shutdown_all();
            first.join();
        }
        #[test]
        fn replace_supersedes_previous() {
            let resolver = Arc::new(FakeResolver::new(&["a"], Arc::new(ScriptedService::healthy())));
            let registry = ConnectionRegistry::new();
            let first = registry.register(build(&resolver), false).unwrap();
            let second = registry.register(build(&resolver), true).unwrap();
            assert!(first.is_shut_down());
            assert!(!second.is_shut_down());
            assert_eq!(1, registry.len());
            let key = registry_key("Scripted", "a,b", 600);
            assert!(registry.get(&key).is_some());
            assert!(wait_for(Duration::from_secs(5), || second.is_connected()));
            assert_eq!(vec![(key, true)], registry.statuses());
            registry.shutdown_all();
            first.join();
            second.join();
        }
        #[test]
        fn distinct_ports_are_distinct_keys() {
            let resolver = Arc::new(FakeResolver::new(&[], Arc::new(ScriptedService::healthy())));
            let registry = ConnectionRegistry::new();
            let one = registry.register(build(&resolver), false).unwrap();
            let other = ServiceConnection::new("Scripted", "a,b", 601, resolver.clone()).with_settings(fast_settings());
            let two = registry.register(other, false).unwrap();
            assert_eq!(2, registry.len());
            registry.shutdown_all();
            one.join();
            two.join();
        }
    }
}
