//!
//! The channel module provides the cancellable I/O layer that sits
//! underneath the RPC transport.
//!
//! A blocked socket read does not reliably come back just because the
//! thread that made it was asked to stop.  The only dependable way to
//! unblock it is to close the socket out from under the call.  To make
//! that possible every blocking primitive (read, write, flush, skip)
//! of a *CancellableChannel* is bracketed by a pair of hooks:
//!
//! *   before_blocking_op - called immediately before delegating to the
//! wrapped stream.  It may refuse the operation (e.g. the call was
//! already cancelled or its deadline has passed).
//! *   after_blocking_op  - called after the operation, whatever its
//! outcome.
//!
//! A *CancelToken* is the hook implementation used by the transport.
//! It knows whether its channel is currently parked in a blocking call
//! and holds a handle that can shut the underlying socket down.  A
//! *Watchdog* thread sweeps the tokens it was given and closes the
//! transport under any call that runs past its deadline.
//!
//! ```
//!   use masterlink::channel::*;
//!   use std::io::{Cursor, Read};
//!
//!   let mut channel = CancellableChannel::new(Cursor::new(b"hello".to_vec()), NoHooks);
//!   let mut text = String::new();
//!   channel.read_to_string(&mut text).unwrap();
//!   assert_eq!("hello", text);
//! ```
pub mod cancel;
pub mod channel;
pub use self::cancel::cancel::*;
pub use self::channel::channel::*;
