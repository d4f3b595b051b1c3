//!
//! The model module holds the distribution metadata mirrored from the
//! master:
//!
//! *  Destination - a named target for outbound dissemination.
//! *  Host - a transfer endpoint, shared between destinations.
//! *  Association - the link between a destination and one of its hosts.
//! It embeds the host record, which is why a host update has to be
//! broadcast to every destination that references the host.
//! *  Alias - a redirect from one destination name to another.
//! *  AccountingUser, CatUrl, TransferGroup, TransferServer and
//! RateStatistics - auxiliary tables.
//! *  DestinationCache - the full topology snapshot of one destination.
//! *  CacheEntity - the closed set of things a push notification can
//! carry.
//!
//! All of these are plain data and serialize with serde so that the
//! wire transport can carry them.
pub mod model;
pub use self::model::model::*;
