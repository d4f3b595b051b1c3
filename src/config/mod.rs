//!
//! Start-up configuration, read once from a TOML file:
//!
//! ```toml
//! [master]
//! hosts = "master1,master2"
//! port = 6601
//! use_cache = true
//!
//! [supervisor]
//! reconnect_backoff_ms = 5000
//!
//! [cache]
//! resync_period_ms = 30000
//! ```
//!
//! Every key has a default, so a missing file or section is fine.
pub mod config;
pub use self::config::config::*;
