pub mod config {
    use crate::connection::SupervisorSettings;
    use log::info;
    use serde::{Deserialize, Serialize};
    use std::fs;
    use std::io;
    use std::path::Path;
    use std::time::Duration;
    use thiserror::Error;

    pub const DEFAULT_MASTER_PORT: u16 = 6601;

    #[derive(Debug, Error)]
    pub enum ConfigError {
        #[error("unable to read {path}: {source}")]
        Read { path: String, source: io::Error },
        #[error("unable to parse {path}: {source}")]
        Parse {
            path: String,
            source: toml::de::Error,
        },
        #[error("invalid configuration: {0}")]
        Invalid(String),
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct MasterConfig {
        /// Candidate master hosts, separated by ',', ';' or '|'.
        pub hosts: String,
        pub port: u16,
        /// Name the master service is bound under.
        pub service: String,
        pub use_cache: bool,
        pub call_timeout_ms: u64,
        pub connect_timeout_ms: u64,
        /// Identity this client subscribes with.
        pub root: String,
        pub client: String,
    }

    impl Default for MasterConfig {
        fn default() -> MasterConfig {
            MasterConfig {
                hosts: String::from("localhost"),
                port: DEFAULT_MASTER_PORT,
                service: String::from("Master"),
                use_cache: false,
                call_timeout_ms: 60_000,
                connect_timeout_ms: 10_000,
                root: whoami::hostname(),
                client: format!("mover-{}", whoami::username()),
            }
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct SupervisorConfig {
        pub warmup_iterations: u32,
        pub heartbeat_attempts: u32,
        pub heartbeat_spacing_ms: u64,
        pub reconnect_backoff_ms: u64,
        pub settle_ticks: u32,
        pub settle_tick_ms: u64,
        pub slow_heartbeat_ms: u64,
    }

    impl Default for SupervisorConfig {
        fn default() -> SupervisorConfig {
            SupervisorConfig {
                warmup_iterations: 3,
                heartbeat_attempts: 3,
                heartbeat_spacing_ms: 1000,
                reconnect_backoff_ms: 5000,
                settle_ticks: 5,
                settle_tick_ms: 1000,
                slow_heartbeat_ms: 30_000,
            }
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct CacheConfig {
        pub resync_period_ms: u64,
        pub scheduler_freshness_ms: u64,
    }

    impl Default for CacheConfig {
        fn default() -> CacheConfig {
            CacheConfig {
                resync_period_ms: 30_000,
                scheduler_freshness_ms: 5000,
            }
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
    #[serde(default)]
    pub struct Config {
        pub master: MasterConfig,
        pub supervisor: SupervisorConfig,
        pub cache: CacheConfig,
    }

    impl Config {
        ///
        /// Load and validate the file at ```path```.  A file that does
        /// not exist yields the defaults.
        ///
        pub fn load(path: &Path) -> Result<Config, ConfigError> {
            if !path.exists() {
                info!("{} not found, using the default configuration", path.display());
                let config = Config::default();
                config.validate()?;
                return Ok(config);
            }
            let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.display().to_string(),
                source,
            })?;
            let config: Config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;
            config.validate()?;
            Ok(config)
        }
        pub fn validate(&self) -> Result<(), ConfigError> {
            if crate::connection::split_hosts(&self.master.hosts).is_empty() {
                return Err(ConfigError::Invalid(String::from("master.hosts lists no host")));
            }
            if self.master.port == 0 {
                return Err(ConfigError::Invalid(String::from("master.port must not be 0")));
            }
            if self.master.service.trim().is_empty() {
                return Err(ConfigError::Invalid(String::from("master.service is empty")));
            }
            let periods = [
                ("master.call_timeout_ms", self.master.call_timeout_ms),
                ("master.connect_timeout_ms", self.master.connect_timeout_ms),
                ("supervisor.heartbeat_spacing_ms", self.supervisor.heartbeat_spacing_ms),
                ("supervisor.reconnect_backoff_ms", self.supervisor.reconnect_backoff_ms),
                ("supervisor.settle_tick_ms", self.supervisor.settle_tick_ms),
                ("cache.resync_period_ms", self.cache.resync_period_ms),
            ];
            for (name, value) in periods.iter() {
                if *value == 0 {
                    return Err(ConfigError::Invalid(format!("{} must not be 0", name)));
                }
            }
            if self.supervisor.heartbeat_attempts == 0 {
                return Err(ConfigError::Invalid(String::from(
                    "supervisor.heartbeat_attempts must not be 0",
                )));
            }
            Ok(())
        }
        pub fn supervisor_settings(&self) -> SupervisorSettings {
            let s = &self.supervisor;
            SupervisorSettings {
                warmup_iterations: s.warmup_iterations,
                heartbeat_attempts: s.heartbeat_attempts,
                heartbeat_spacing: Duration::from_millis(s.heartbeat_spacing_ms),
                reconnect_backoff: Duration::from_millis(s.reconnect_backoff_ms),
                settle_ticks: s.settle_ticks,
                settle_tick: Duration::from_millis(s.settle_tick_ms),
                slow_heartbeat: Duration::from_millis(s.slow_heartbeat_ms),
            }
        }
        pub fn call_timeout(&self) -> Duration {
            Duration::from_millis(self.master.call_timeout_ms)
        }
        pub fn connect_timeout(&self) -> Duration {
            Duration::from_millis(self.master.connect_timeout_ms)
        }
        pub fn resync_period(&self) -> Duration {
            Duration::from_millis(self.cache.resync_period_ms)
        }
        pub fn scheduler_freshness(&self) -> Duration {
            Duration::from_millis(self.cache.scheduler_freshness_ms)
        }
    }

}
