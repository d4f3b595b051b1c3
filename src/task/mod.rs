//!
//! The task module holds the small amount of machinery shared by every
//! background thread in the crate:
//!
//! *  StopSignal - a clonable stop request.  Threads sleep *on* the
//! signal rather than next to it, so a stop request wakes a sleeping
//! thread at once instead of after the rest of its sleep.
//! *  PeriodicTask - a named thread that runs a closure, sleeps for a
//! fixed period and repeats until it is asked to stop.
//!
pub mod task;
pub use self::task::task::*;
