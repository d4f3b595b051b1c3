//!
//! The remote module describes what this crate needs from the other
//! end of the link, without saying how the bytes travel:
//!
//! *   Resolver / Directory - find the master's service directory at
//! host:port and look a named service up in it.
//! *   RemoteService - what every supervised service must answer:
//! subscribe and the liveness probes used as heartbeats.
//! *   MasterService - the metadata operations of the master.
//! *   PushSink / Notification - the reverse direction, used by the
//! master to push cache deltas to a subscribed client.
//!
//! The wire module provides a TCP implementation of all of these;
//! tests provide in-memory ones.
pub mod remote;
pub use self::remote::remote::*;
