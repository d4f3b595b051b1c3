//!
//! The connection module keeps a process connected to a remote
//! service that may restart, fail over or go quiet.
//!
//! A *ServiceConnection* owns one logical connection to one named
//! service reachable at one of several candidate hosts.  Once started,
//! a dedicated supervisor thread runs the connect/heartbeat/reconnect
//! cycle:
//!
//! 1.  While disconnected, try the candidate hosts round robin, starting
//! from the first, sleeping the reconnect backoff between failures.
//! 2.  After a warm-up of a few supervisor iterations, probe the
//! service (up to three attempts one second apart).  A positive answer
//! refreshes the clock offset; NOT_REGISTERED drops the connection at
//! once; three failures in a row drop it too.
//! 3.  Dropping the connection calls the disconnect sink exactly once
//! and the next iteration reconnects.
//! 4.  Connected iterations end with a short settle delay.
//!
//! Callers hold an ```Arc<ServiceConnection>``` for the life of the
//! process; the remote handle behind it is replaced on reconnect.
//!
//! The *ConnectionRegistry* guarantees at most one ServiceConnection per
//! (service, hosts, port) key.
pub mod connection;
pub mod registry;
pub use self::connection::connection::*;
pub use self::registry::registry::*;
#[cfg(test)]
pub(crate) use self::connection::connection::testing;
