//!
//! The wire module carries the remote contracts over TCP.
//!
//! Every message is one line of JSON.  A client opens a connection to
//! the master's port and sends requests, each answered by exactly one
//! reply:
//!
//! *   ```list``` - names bound in the directory.
//! *   ```lookup``` - is a name bound?
//! *   ```call``` - invoke one operation of a bound service.
//!
//! A ```listen``` request turns its connection into a push stream: after
//! the reply the server writes one Notification per line until either
//! side goes away.
//!
//! On the client side every socket is wrapped in a CancellableChannel
//! whose CancelToken carries the call deadline.  A shared Watchdog cuts
//! the socket from under a call that overruns it, so a stuck master
//! cannot wedge a supervisor forever.
//!
//! *MasterServer* is the server half.  It exposes MasterService
//! implementations by name and broadcasts notifications to listeners.
pub mod client;
pub mod protocol;
pub mod server;
pub use self::client::client::*;
pub use self::protocol::protocol::*;
pub use self::server::server::*;
