pub mod proxy {
    use crate::cache::{CacheError, MetadataCache};
    use crate::connection::ServiceConnection;
    use crate::model::*;
    use crate::remote::MasterService;
    use log::{debug, warn};
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;

    pub trait ManagementAccess: Send + Sync {
        fn get_destination_caches(&self) -> Result<HashMap<String, DestinationCache>, CacheError>;
        fn get_destination_scheduler_cache(&self, name: &str) -> Result<SchedulerCache, CacheError>;
        fn restart_destination(&self, name: &str, graceful: bool) -> Result<SchedulerCache, CacheError>;
        fn update_host(&self, host: &Host) -> Result<(), CacheError>;
        fn remove_destination(&self, name: &str) -> Result<(), CacheError>;
    }

    pub trait DataBaseAccess: Send + Sync {
        fn get_destination(&self, name: &str) -> Result<Destination, CacheError>;
        fn get_association(&self, destination: &str, host: &str) -> Result<Association, CacheError>;
        fn get_user(&self, name: &str) -> Result<AccountingUser, CacheError>;
        fn get_bad_data_transfers_count(&self, destination: &str) -> Result<u32, CacheError>;
        fn get_cat_urls(&self) -> Result<Vec<CatUrl>, CacheError>;
        fn get_transfer_groups(&self) -> Result<Vec<TransferGroup>, CacheError>;
        fn get_transfer_servers(&self, group: &str) -> Result<Vec<TransferServer>, CacheError>;
        fn get_rate_statistics(&self, destination: &str) -> Result<RateStatistics, CacheError>;
    }

    fn require(value: &str, operation: &'static str) -> Result<(), CacheError> {
        if value.trim().is_empty() {
            Err(CacheError::InvalidParameter(operation))
        } else {
            Ok(())
        }
    }

    ///
    /// Every call goes to the master through the connection's current
    /// handle.
    ///
    pub struct DirectAccess<S: MasterService + ?Sized + 'static> {
        connection: Arc<ServiceConnection<S>>,
    }

    impl<S: MasterService + ?Sized + 'static> DirectAccess<S> {
        pub fn new(connection: Arc<ServiceConnection<S>>) -> DirectAccess<S> {
            DirectAccess { connection }
        }
        fn master(&self) -> Result<Arc<S>, CacheError> {
            Ok(self.connection.get_handle()?)
        }
    }

    impl<S: MasterService + ?Sized + 'static> ManagementAccess for DirectAccess<S> {
        fn get_destination_caches(&self) -> Result<HashMap<String, DestinationCache>, CacheError> {
            Ok(self.master()?.get_destination_caches()?)
        }
        fn get_destination_scheduler_cache(&self, name: &str) -> Result<SchedulerCache, CacheError> {
            require(name, "get_destination_scheduler_cache")?;
            Ok(self.master()?.get_destination_scheduler_cache(name)?)
        }
        fn restart_destination(&self, name: &str, graceful: bool) -> Result<SchedulerCache, CacheError> {
            require(name, "restart_destination")?;
            Ok(self.master()?.restart_destination(name, graceful)?)
        }
        fn update_host(&self, host: &Host) -> Result<(), CacheError> {
            require(&host.name, "update_host")?;
            Ok(self.master()?.update_host(host)?)
        }
        fn remove_destination(&self, name: &str) -> Result<(), CacheError> {
            require(name, "remove_destination")?;
            Ok(self.master()?.remove_destination(name)?)
        }
    }

    impl<S: MasterService + ?Sized + 'static> DataBaseAccess for DirectAccess<S> {
        fn get_destination(&self, name: &str) -> Result<Destination, CacheError> {
            require(name, "get_destination")?;
            Ok(self.master()?.get_destination(name)?)
        }
        fn get_association(&self, destination: &str, host: &str) -> Result<Association, CacheError> {
            require(destination, "get_association")?;
            require(host, "get_association")?;
            Ok(self.master()?.get_association(destination, host)?)
        }
        fn get_user(&self, name: &str) -> Result<AccountingUser, CacheError> {
            require(name, "get_user")?;
            Ok(self.master()?.get_user(name)?)
        }
        fn get_bad_data_transfers_count(&self, destination: &str) -> Result<u32, CacheError> {
            require(destination, "get_bad_data_transfers_count")?;
            Ok(self.master()?.get_bad_data_transfers_count(destination)?)
        }
        fn get_cat_urls(&self) -> Result<Vec<CatUrl>, CacheError> {
            Ok(self.master()?.get_cat_urls()?)
        }
        fn get_transfer_groups(&self) -> Result<Vec<TransferGroup>, CacheError> {
            Ok(self.master()?.get_transfer_groups()?)
        }
        fn get_transfer_servers(&self, group: &str) -> Result<Vec<TransferServer>, CacheError> {
            require(group, "get_transfer_servers")?;
            Ok(self.master()?.get_transfer_servers(group)?)
        }
        fn get_rate_statistics(&self, destination: &str) -> Result<RateStatistics, CacheError> {
            require(destination, "get_rate_statistics")?;
            Ok(self.master()?.get_rate_statistics(destination)?)
        }
    }
    ///
    /// Reads come from the MetadataCache; a NotInCache miss falls
    /// through to the master.  NotReady is passed back to the caller
    /// so nothing reads a half-built cache.  Writes go to the master
    /// first and are then applied locally.
    ///
    /// ```get_destination``` also refreshes the entry's scheduler cache
    /// from the master when it is older than the freshness window.
    ///
    pub struct CachedAccess<S: MasterService + ?Sized + 'static> {
        direct: DirectAccess<S>,
        cache: Arc<MetadataCache>,
        scheduler_freshness: Duration,
    }

    impl<S: MasterService + ?Sized + 'static> CachedAccess<S> {
        pub fn new(connection: Arc<ServiceConnection<S>>, cache: Arc<MetadataCache>) -> CachedAccess<S> {
            CachedAccess {
                direct: DirectAccess::new(connection),
                cache,
                scheduler_freshness: SCHEDULER_CACHE_FRESHNESS,
            }
        }
        pub fn with_scheduler_freshness(mut self, freshness: Duration) -> CachedAccess<S> {
            self.scheduler_freshness = freshness;
            self
        }
        fn cached(&self, destination: &str) -> Result<Option<DestinationCache>, CacheError> {
            match self.cache.get(destination) {
                Ok(entry) => Ok(Some(entry)),
                Err(CacheError::NotInCache(_)) => {
                    debug!("{} not in cache, asking the master", destination);
                    Ok(None)
                }
                Err(e) => Err(e),
            }
        }
        fn refresh_scheduler(&self, entry: &DestinationCache) {
            if !entry.is_scheduler_cache_expired(epoch_millis(), self.scheduler_freshness) {
                return;
            }
            match self.direct.get_destination_scheduler_cache(entry.destination_name()) {
                Ok(scheduler) => self.cache.apply_update(CacheEntity::SchedulerCache(scheduler)),
                Err(e) => warn!(
                    "Unable to refresh the scheduler cache of {}: {}",
                    entry.destination_name(),
                    e
                ),
            }
        }
    }

    impl<S: MasterService + ?Sized + 'static> ManagementAccess for CachedAccess<S> {
        fn get_destination_caches(&self) -> Result<HashMap<String, DestinationCache>, CacheError> {
            Ok(self
                .cache
                .get_all()?
                .into_iter()
                .map(|entry| (String::from(entry.destination_name()), entry))
                .collect())
        }
        fn get_destination_scheduler_cache(&self, name: &str) -> Result<SchedulerCache, CacheError> {
            let scheduler = self.direct.get_destination_scheduler_cache(name)?;
            self.cache
                .apply_update(CacheEntity::SchedulerCache(scheduler.clone()));
            Ok(scheduler)
        }
        fn restart_destination(&self, name: &str, graceful: bool) -> Result<SchedulerCache, CacheError> {
            let scheduler = self.direct.restart_destination(name, graceful)?;
            self.cache
                .apply_update(CacheEntity::SchedulerCache(scheduler.clone()));
            Ok(scheduler)
        }
        fn update_host(&self, host: &Host) -> Result<(), CacheError> {
            self.direct.update_host(host)?;
            self.cache.apply_update(CacheEntity::Host(host.clone()));
            Ok(())
        }
        fn remove_destination(&self, name: &str) -> Result<(), CacheError> {
            self.direct.remove_destination(name)?;
            self.cache
                .apply_remove(CacheEntity::Destination(Destination::named(name)));
            Ok(())
        }
    }

    impl<S: MasterService + ?Sized + 'static> DataBaseAccess for CachedAccess<S> {
        fn get_destination(&self, name: &str) -> Result<Destination, CacheError> {
            require(name, "get_destination")?;
            match self.cached(name)? {
                Some(entry) => {
                    self.refresh_scheduler(&entry);
                    Ok(entry.destination)
                }
                None => self.direct.get_destination(name),
            }
        }
        fn get_association(&self, destination: &str, host: &str) -> Result<Association, CacheError> {
            require(destination, "get_association")?;
            require(host, "get_association")?;
            let hit = self
                .cached(destination)?
                .and_then(|mut entry| entry.associations.remove(host));
            match hit {
                Some(association) => Ok(association),
                None => self.direct.get_association(destination, host),
            }
        }
        fn get_user(&self, name: &str) -> Result<AccountingUser, CacheError> {
            require(name, "get_user")?;
            match self.cache.get_user(name)? {
                Some(user) => Ok(user),
                None => self.direct.get_user(name),
            }
        }
        fn get_bad_data_transfers_count(&self, destination: &str) -> Result<u32, CacheError> {
            require(destination, "get_bad_data_transfers_count")?;
            match self.cached(destination)? {
                Some(entry) => Ok(entry.bad_data_transfers_count),
                None => self.direct.get_bad_data_transfers_count(destination),
            }
        }
        fn get_cat_urls(&self) -> Result<Vec<CatUrl>, CacheError> {
            self.cache.get_cat_urls()
        }
        fn get_transfer_groups(&self) -> Result<Vec<TransferGroup>, CacheError> {
            self.direct.get_transfer_groups()
        }
        fn get_transfer_servers(&self, group: &str) -> Result<Vec<TransferServer>, CacheError> {
            self.direct.get_transfer_servers(group)
        }
        fn get_rate_statistics(&self, destination: &str) -> Result<RateStatistics, CacheError> {
            self.direct.get_rate_statistics(destination)
        }
    }
    ///
    /// Pick the management accessor for this process.
    ///
    pub fn management_access<S: MasterService + ?Sized + 'static>(
        connection: Arc<ServiceConnection<S>>,
        cache: Arc<MetadataCache>,
        use_cache: bool,
    ) -> Arc<dyn ManagementAccess> {
        if use_cache {
            Arc::new(CachedAccess::new(connection, cache))
        } else {
            Arc::new(DirectAccess::new(connection))
        }
    }
    ///
    /// Pick the database accessor for this process.  A cached accessor
    /// refreshes scheduler caches older than ```scheduler_freshness```.
    ///
    pub fn database_access<S: MasterService + ?Sized + 'static>(
        connection: Arc<ServiceConnection<S>>,
        cache: Arc<MetadataCache>,
        use_cache: bool,
        scheduler_freshness: Duration,
    ) -> Arc<dyn DataBaseAccess> {
        if use_cache {
            Arc::new(CachedAccess::new(connection, cache).with_scheduler_freshness(scheduler_freshness))
        } else {
            Arc::new(DirectAccess::new(connection))
        }
    }

}
