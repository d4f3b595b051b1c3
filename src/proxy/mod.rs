//!
//! The proxy module decides, once at start-up, whether metadata reads
//! go straight to the master or through the MetadataCache.
//!
//! Two access interfaces are exposed:
//!
//! *  ManagementAccess - destination snapshots, scheduler state,
//! restarts, host updates and destination removal.
//! *  DataBaseAccess - destinations, associations, users, category
//! URLs, transfer groups/servers and rate statistics.
//!
//! Each comes in two flavours.  *DirectAccess* calls the live remote
//! handle of a ServiceConnection every time.  *CachedAccess* answers
//! reads from the cache, falls through to the remote handle on a cache
//! miss, and applies the result of write operations to the cache so it
//! does not wait for the next push or resync.
//!
//! ```management_access``` and ```database_access``` pick the flavour
//! from the use_cache flag.
pub mod proxy;
pub use self::proxy::proxy::*;
