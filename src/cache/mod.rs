//!
//! The cache module keeps a client-side mirror of the master's
//! distribution metadata.
//!
//! Two mechanisms keep it current:
//!
//! *   Push notifications from the master (insert/update/remove of
//! aliases, associations, destinations, hosts, scheduler caches or
//! whole destination entries), applied as they arrive.
//! *   A full resync every 30 seconds by a *ResyncTask*.
//!
//! The two race.  The rule that keeps a slow resync from undoing a
//! push is the creation time stamped on every DestinationCache: during
//! a resync a local entry whose creation time is strictly greater than
//! the snapshot's copy is kept.  Otherwise the snapshot copy is adopted,
//! carrying over the locally accumulated bad-transfer count.
//!
//! Locking: structural changes (adding or removing whole entries,
//! resync, host fan-out) take the structure lock exclusively.  Field
//! level changes take it shared and lock only the one entry they touch,
//! so two destinations can be updated at the same time.
//!
//! When caching is enabled, every read fails with NotReady until the
//! first resync has succeeded.
pub mod cache;
pub mod resync;
pub use self::cache::cache::*;
pub use self::resync::resync::*;
#[cfg(test)]
pub(crate) use self::cache::cache::fixtures;
