pub mod model {
    use serde::{Deserialize, Serialize};
    use std::collections::HashMap;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    /// How long an embedded scheduler cache is considered fresh.
    pub const SCHEDULER_CACHE_FRESHNESS: Duration = Duration::from_secs(5);

    ///
    /// Milliseconds since the Unix epoch, the unit in which the master
    /// reports time.
    ///
    pub fn epoch_millis() -> i64 {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(d) => d.as_millis() as i64,
            Err(e) => -(e.duration().as_millis() as i64),
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct AccountingUser {
        pub name: String,
        #[serde(default)]
        pub uid: Option<i64>,
        #[serde(default)]
        pub comment: String,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct Destination {
        pub name: String,
        #[serde(default)]
        pub comment: String,
        #[serde(default)]
        pub active: bool,
        #[serde(default)]
        pub transfer_group: String,
        /// The user transfers to this destination are accounted to.
        #[serde(default)]
        pub user: Option<AccountingUser>,
    }

    impl Destination {
        /// A destination record that carries nothing but its name.
        pub fn named(name: &str) -> Destination {
            Destination {
                name: String::from(name),
                ..Destination::default()
            }
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct Host {
        /// Host id; unique across the master.
        pub name: String,
        #[serde(default)]
        pub nickname: String,
        #[serde(default)]
        pub address: String,
        #[serde(default)]
        pub login: String,
        #[serde(default)]
        pub transfer_method: String,
        #[serde(default)]
        pub active: bool,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct Association {
        pub destination_name: String,
        pub host_name: String,
        #[serde(default)]
        pub priority: i32,
        pub host: Host,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct Alias {
        /// The destination whose alias table holds this entry.
        pub destination_name: String,
        /// The destination name being redirected.
        pub alias_name: String,
        #[serde(default)]
        pub comment: String,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct CatUrl {
        pub category_id: i64,
        pub url: String,
        #[serde(default)]
        pub description: String,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct TransferGroup {
        pub name: String,
        #[serde(default)]
        pub comment: String,
        #[serde(default)]
        pub active: bool,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct TransferServer {
        pub name: String,
        pub group_name: String,
        pub host: String,
        pub port: u16,
        #[serde(default)]
        pub active: bool,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct RateStatistics {
        pub destination_name: String,
        pub transfers: u64,
        pub bytes: u64,
        pub duration_ms: u64,
    }

    ///
    /// Scheduling state of a destination as last reported by the
    /// master.
    ///
    #[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct SchedulerCache {
        pub destination_name: String,
        #[serde(default)]
        pub status: String,
        #[serde(default)]
        pub queue_size: u64,
        #[serde(default)]
        pub last_transfer: Option<i64>,
    }
    ///
    /// Everything the client keeps about one destination.
    ///
    /// *  associations are keyed by host id.
    /// *  aliases are keyed by alias name.
    /// *  creation_time is stamped by the master when it builds the
    /// snapshot; it decides which of two copies is newer.
    /// *  bad_data_transfers_count is accumulated locally and is not
    /// part of what the master sends.
    /// *  scheduler and scheduler_updated hold the embedded scheduler
    /// cache and the local time it was last set.
    ///
    #[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct DestinationCache {
        pub destination: Destination,
        #[serde(default)]
        pub associations: HashMap<String, Association>,
        #[serde(default)]
        pub aliases: HashMap<String, Alias>,
        pub creation_time: i64,
        #[serde(default)]
        pub bad_data_transfers_count: u32,
        #[serde(default)]
        pub scheduler: Option<SchedulerCache>,
        #[serde(default)]
        pub scheduler_updated: i64,
    }

    impl DestinationCache {
        pub fn new(destination: Destination, creation_time: i64) -> DestinationCache {
            DestinationCache {
                destination,
                creation_time,
                ..DestinationCache::default()
            }
        }
        pub fn destination_name(&self) -> &str {
            &self.destination.name
        }
        /// Builder style: add an association keyed by its host id.
        pub fn with_association(mut self, association: Association) -> DestinationCache {
            self.associations
                .insert(association.host_name.clone(), association);
            self
        }
        /// Builder style: add an alias keyed by its alias name.
        pub fn with_alias(mut self, alias: Alias) -> DestinationCache {
            self.aliases.insert(alias.alias_name.clone(), alias);
            self
        }
        pub fn set_scheduler_cache(&mut self, scheduler: SchedulerCache, now: i64) {
            self.scheduler = Some(scheduler);
            self.scheduler_updated = now;
        }
        ///
        /// True if the scheduler cache is missing or was last set more
        /// than ```freshness``` before ```now``` (both in epoch
        /// milliseconds).
        ///
        pub fn is_scheduler_cache_expired(&self, now: i64, freshness: Duration) -> bool {
            self.scheduler.is_none() || now - self.scheduler_updated > freshness.as_millis() as i64
        }
    }
    ///
    /// The kinds of entity a push notification can carry.  Matching on
    /// this is exhaustive so every new kind must be handled wherever
    /// notifications are applied.
    ///
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(tag = "kind", content = "entity")]
    pub enum CacheEntity {
        Alias(Alias),
        Association(Association),
        Destination(Destination),
        Host(Host),
        DestinationCache(Box<DestinationCache>),
        SchedulerCache(SchedulerCache),
    }

    impl CacheEntity {
        pub fn kind(&self) -> &'static str {
            match self {
                CacheEntity::Alias(_) => "Alias",
                CacheEntity::Association(_) => "Association",
                CacheEntity::Destination(_) => "Destination",
                CacheEntity::Host(_) => "Host",
                CacheEntity::DestinationCache(_) => "DestinationCache",
                CacheEntity::SchedulerCache(_) => "SchedulerCache",
            }
        }
        /// The destination the entity belongs to, if it belongs to one.
        pub fn owner(&self) -> Option<&str> {
            match self {
                CacheEntity::Alias(a) => Some(&a.destination_name),
                CacheEntity::Association(a) => Some(&a.destination_name),
                CacheEntity::Destination(d) => Some(&d.name),
                CacheEntity::Host(_) => None,
                CacheEntity::DestinationCache(c) => Some(c.destination_name()),
                CacheEntity::SchedulerCache(s) => Some(&s.destination_name),
            }
        }
    }

}
