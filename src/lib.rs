//!  masterlink is the part of a file-dissemination mover that keeps
//! it attached to its master.  The master knows about destinations,
//! the hosts files are sent to, the associations between the two,
//! aliases, accounting users and the category/URL table.  Movers need
//! that metadata constantly and must survive the master restarting,
//! failing over to another host or going quiet.
//!
//! The crate provides two things:
//!
//! 1.  A supervised connection to a named remote service
//! (connection::ServiceConnection).  A background thread per
//! connection connects to the first reachable candidate host,
//! subscribes, probes the service periodically and reconnects when
//! the probes stop working.  Callers only ever ask for the current
//! handle; they never see network faults, only "not initialized yet"
//! or "unavailable".
//! 2.  A client-side mirror of the master's metadata
//! (cache::MetadataCache) kept current by push notifications from the
//! master and a full resync every 30 seconds.  A creation time stamped
//! on every destination entry stops a slow resync from undoing a
//! newer push.
//!
//! The proxy module decides once, at start-up, whether readers see the
//! cache or go straight to the master.
//!
//! ## Running the mover link:
//!
//!   The masterlink binary takes the following options:
//!
//! *   --config - A TOML file describing the master hosts and port, the
//! supervisor timing and whether the cache is used (see the config
//! module).  Defaults to /etc/masterlink/masterlink.toml; a missing
//! file means all defaults.
//! *   --log-file - The file in which masterlink logs what it does.
//! *   --verbose - Log at debug rather than info level.
//!
//! ## Wire protocol
//!
//!   The remote and wire modules are separate.  remote describes what
//! is needed from a master (resolve a directory, look a service up,
//! call it) and wire implements that over TCP with one JSON message
//! per line.  Every blocking socket operation on the client side goes
//! through a channel::CancellableChannel so a watchdog can cut a call
//! that overruns its deadline.  See the wire module for the message
//! formats.
pub mod cache;
pub use cache::*;
pub mod channel;
pub use channel::*;
pub mod config;
pub use config::*;
pub mod connection;
pub use connection::*;
pub mod model;
pub use model::*;
pub mod proxy;
pub use proxy::*;
pub mod remote;
pub use remote::*;
pub mod task;
pub use task::*;
pub mod wire;
pub use wire::*;
