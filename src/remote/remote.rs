pub mod remote {
    use crate::model::*;
    use serde::{Deserialize, Serialize};
    use std::collections::HashMap;
    use std::fmt;
    use std::io;
    use std::sync::Arc;
    use thiserror::Error;

    /// Probe result meaning "this client is not registered with me".
    pub const NOT_REGISTERED: i64 = -1;

    #[derive(Debug, Error)]
    pub enum RemoteError {
        #[error("i/o failure: {0}")]
        Io(#[from] io::Error),
        /// The remote object is gone, typically because the peer restarted
        /// or is not ready yet.
        #[error("no such object in table: {0}")]
        NoSuchObject(String),
        #[error("{0} is not bound")]
        NotBound(String),
        #[error("protocol error: {0}")]
        Protocol(String),
        #[error("remote fault: {0}")]
        Fault(String),
        #[error("incorrect value for remote time: {0}")]
        InvalidRemoteTime(i64),
    }

    impl RemoteError {
        pub fn is_server_not_ready(&self) -> bool {
            matches!(self, RemoteError::NoSuchObject(_))
        }
    }
    ///
    /// A cache delta pushed by the master.
    ///
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(tag = "action", content = "body", rename_all = "snake_case")]
    pub enum Notification {
        Insert(CacheEntity),
        Update(CacheEntity),
        Remove(CacheEntity),
    }

    pub trait PushSink: Send + Sync {
        fn notify(&self, notification: Notification);
    }
    ///
    /// Identifies a client to the master on subscribe and in the
    /// is_registered probe.  If a sink is attached the transport
    /// delivers the master's push notifications to it.
    ///
    #[derive(Clone)]
    pub struct CallbackHandle {
        root: String,
        service: String,
        sink: Option<Arc<dyn PushSink>>,
    }

    impl CallbackHandle {
        pub fn new(root: &str, service: &str) -> CallbackHandle {
            CallbackHandle {
                root: String::from(root),
                service: String::from(service),
                sink: None,
            }
        }
        pub fn with_sink(mut self, sink: Arc<dyn PushSink>) -> CallbackHandle {
            self.sink = Some(sink);
            self
        }
        pub fn root(&self) -> &str {
            &self.root
        }
        pub fn service(&self) -> &str {
            &self.service
        }
        pub fn sink(&self) -> Option<Arc<dyn PushSink>> {
            self.sink.clone()
        }
    }

    impl fmt::Debug for CallbackHandle {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("CallbackHandle")
                .field("root", &self.root)
                .field("service", &self.service)
                .field("sink", &self.sink.is_some())
                .finish()
        }
    }
    ///
    /// Operations every supervised remote service provides.  Times are
    /// the remote's epoch milliseconds.
    ///
    /// *  subscribe - register the caller and return the remote time.
    /// *  is_available - heartbeat for clients without a callback handle.
    /// *  is_registered - heartbeat for subscribed clients; returns
    /// NOT_REGISTERED if the remote has forgotten the client.
    ///
    pub trait RemoteService: Send + Sync {
        fn subscribe(&self, client: &CallbackHandle) -> Result<i64, RemoteError>;
        fn is_available(&self) -> Result<i64, RemoteError>;
        fn is_registered(&self, root: &str, service: &str) -> Result<i64, RemoteError>;
    }
    ///
    /// The master's metadata surface.  The first group are management
    /// operations, the second database reads.
    ///
    pub trait MasterService: RemoteService {
        fn get_destination_caches(&self) -> Result<HashMap<String, DestinationCache>, RemoteError>;
        fn get_destination_scheduler_cache(&self, name: &str) -> Result<SchedulerCache, RemoteError>;
        fn restart_destination(&self, name: &str, graceful: bool) -> Result<SchedulerCache, RemoteError>;
        fn update_host(&self, host: &Host) -> Result<(), RemoteError>;
        fn remove_destination(&self, name: &str) -> Result<(), RemoteError>;

        fn get_destination(&self, name: &str) -> Result<Destination, RemoteError>;
        fn get_association(&self, destination: &str, host: &str) -> Result<Association, RemoteError>;
        fn get_user(&self, name: &str) -> Result<AccountingUser, RemoteError>;
        fn get_bad_data_transfers_count(&self, destination: &str) -> Result<u32, RemoteError>;
        fn get_cat_urls(&self) -> Result<Vec<CatUrl>, RemoteError>;
        fn get_transfer_groups(&self) -> Result<Vec<TransferGroup>, RemoteError>;
        fn get_transfer_servers(&self, group: &str) -> Result<Vec<TransferServer>, RemoteError>;
        fn get_rate_statistics(&self, destination: &str) -> Result<RateStatistics, RemoteError>;
    }
    ///
    /// A resolved service directory on one host.
    ///
    pub trait Directory<S: ?Sized>: Send + Sync {
        /// Names currently bound in the directory.
        fn list(&self) -> Result<Vec<String>, RemoteError>;
        fn lookup(&self, name: &str) -> Result<Arc<S>, RemoteError>;
    }
    ///
    /// Locates the service directory listening at host:port.
    ///
    pub trait Resolver<S: ?Sized>: Send + Sync {
        fn resolve(&self, host: &str, port: u16) -> Result<Arc<dyn Directory<S>>, RemoteError>;
    }

}
