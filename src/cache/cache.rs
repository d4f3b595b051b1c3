pub mod cache {
    use crate::connection::{ConnectionError, ServiceConnection};
    use crate::model::*;
    use crate::remote::{MasterService, Notification, PushSink, RemoteError};
    use dashmap::DashMap;
    use log::{debug, info};
    use parking_lot::{Mutex, RwLock};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Instant;
    use thiserror::Error;

    ///
    /// Errors seen by readers of metadata, cached or not.
    ///
    #[derive(Debug, Error)]
    pub enum CacheError {
        #[error("Destination {0} not in cache")]
        NotInCache(String),
        #[error("metadata cache not ready yet")]
        NotReady,
        #[error("Invalid parameter(s) for {0}")]
        InvalidParameter(&'static str),
        #[error(transparent)]
        Connection(#[from] ConnectionError),
        #[error(transparent)]
        Remote(#[from] RemoteError),
    }
    ///
    /// Everything a resync installs.
    ///
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Snapshot {
        pub destinations: HashMap<String, DestinationCache>,
        pub cat_urls: Vec<CatUrl>,
    }
    ///
    /// Where resync snapshots come from.
    ///
    pub trait SnapshotSource: Send + Sync {
        fn fetch_snapshot(&self) -> Result<Snapshot, CacheError>;
    }

    impl<S: MasterService + ?Sized + 'static> SnapshotSource for ServiceConnection<S> {
        fn fetch_snapshot(&self) -> Result<Snapshot, CacheError> {
            let master = self.get_handle()?;
            let destinations = master.get_destination_caches()?;
            let cat_urls = master.get_cat_urls()?;
            Ok(Snapshot {
                destinations,
                cat_urls,
            })
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ResyncReport {
        pub destinations: usize,
        /// Local entries kept because they were newer than the snapshot.
        pub kept_local: usize,
        pub cat_urls: usize,
        pub users: usize,
    }

    pub struct MetadataCache {
        enabled: bool,
        ready: AtomicBool,
        structure: RwLock<()>,
        destinations: DashMap<String, DestinationCache>,
        users: RwLock<HashMap<String, AccountingUser>>,
        cat_urls: RwLock<Vec<CatUrl>>,
        resyncing: Mutex<()>,
    }

    impl MetadataCache {
        ///
        /// ```enabled``` says whether the process reads through the
        /// cache at all; a disabled cache is always "ready".
        ///
        pub fn new(enabled: bool) -> MetadataCache {
            MetadataCache {
                enabled,
                ready: AtomicBool::new(false),
                structure: RwLock::new(()),
                destinations: DashMap::new(),
                users: RwLock::new(HashMap::new()),
                cat_urls: RwLock::new(Vec::new()),
                resyncing: Mutex::new(()),
            }
        }
        pub fn is_enabled(&self) -> bool {
            self.enabled
        }
        pub fn is_ready(&self) -> bool {
            !self.enabled || self.ready.load(Ordering::SeqCst)
        }
        fn check_ready(&self) -> Result<(), CacheError> {
            if self.is_ready() {
                Ok(())
            } else {
                Err(CacheError::NotReady)
            }
        }
        pub fn len(&self) -> usize {
            self.destinations.len()
        }
        pub fn is_empty(&self) -> bool {
            self.destinations.is_empty()
        }

        // -------------------------------------------------------------
        // Reads

        pub fn get(&self, destination_name: &str) -> Result<DestinationCache, CacheError> {
            self.check_ready()?;
            let _structure = self.structure.read();
            self.destinations
                .get(destination_name)
                .map(|entry| entry.value().clone())
                .ok_or_else(|| CacheError::NotInCache(String::from(destination_name)))
        }
        /// Every entry, sorted by destination name.
        pub fn get_all(&self) -> Result<Vec<DestinationCache>, CacheError> {
            self.check_ready()?;
            let mut result: Vec<DestinationCache> = {
                let _structure = self.structure.read();
                self.destinations
                    .iter()
                    .map(|entry| entry.value().clone())
                    .collect()
            };
            result.sort_by(|a, b| a.destination.name.cmp(&b.destination.name));
            Ok(result)
        }
        pub fn get_user(&self, name: &str) -> Result<Option<AccountingUser>, CacheError> {
            self.check_ready()?;
            Ok(self.users.read().get(name).cloned())
        }
        pub fn get_cat_urls(&self) -> Result<Vec<CatUrl>, CacheError> {
            self.check_ready()?;
            Ok(self.cat_urls.read().clone())
        }
        pub fn bad_data_transfers_count(&self, destination_name: &str) -> Result<u32, CacheError> {
            self.get(destination_name)
                .map(|entry| entry.bad_data_transfers_count)
        }
        pub fn set_bad_data_transfers_count(&self, destination_name: &str, count: u32) -> Result<(), CacheError> {
            let _structure = self.structure.read();
            match self.destinations.get_mut(destination_name) {
                Some(mut entry) => {
                    entry.bad_data_transfers_count = count;
                    Ok(())
                }
                None => Err(CacheError::NotInCache(String::from(destination_name))),
            }
        }

        // -------------------------------------------------------------
        // Push notifications

        pub fn apply(&self, notification: Notification) {
            match notification {
                Notification::Insert(entity) => self.apply_insert(entity),
                Notification::Update(entity) => self.apply_update(entity),
                Notification::Remove(entity) => self.apply_remove(entity),
            }
        }

        pub fn apply_insert(&self, entity: CacheEntity) {
            debug!("insert: {}:{:?}", entity.kind(), entity.owner());
            match entity {
                CacheEntity::DestinationCache(cache) => self.insert_destination_cache(*cache),
                // A new bare destination or host has nothing to attach
                // to until the next resync brings its topology.
                CacheEntity::Destination(_) | CacheEntity::Host(_) => {}
                other => self.apply_update(other),
            }
        }

        pub fn apply_update(&self, entity: CacheEntity) {
            debug!("update: {}:{:?}", entity.kind(), entity.owner());
            match entity {
                CacheEntity::Alias(alias) => {
                    let owner = alias.destination_name.clone();
                    self.with_entry(&owner, move |entry| {
                        entry.aliases.insert(alias.alias_name.clone(), alias);
                    });
                }
                CacheEntity::Association(association) => {
                    let owner = association.destination_name.clone();
                    self.with_entry(&owner, move |entry| {
                        entry
                            .associations
                            .insert(association.host_name.clone(), association);
                    });
                }
                CacheEntity::Destination(destination) => {
                    let owner = destination.name.clone();
                    self.with_entry(&owner, move |entry| entry.destination = destination);
                }
                CacheEntity::Host(host) => self.update_host(host),
                CacheEntity::DestinationCache(cache) => self.insert_destination_cache(*cache),
                CacheEntity::SchedulerCache(scheduler) => {
                    let owner = scheduler.destination_name.clone();
                    let now = epoch_millis();
                    self.with_entry(&owner, move |entry| entry.set_scheduler_cache(scheduler, now));
                }
            }
        }

        pub fn apply_remove(&self, entity: CacheEntity) {
            debug!("remove: {}:{:?}", entity.kind(), entity.owner());
            match entity {
                CacheEntity::Alias(alias) => {
                    self.with_entry(&alias.destination_name, |entry| {
                        entry.aliases.remove(&alias.alias_name);
                    });
                }
                CacheEntity::Association(association) => {
                    self.with_entry(&association.destination_name, |entry| {
                        entry.associations.remove(&association.host_name);
                    });
                }
                CacheEntity::Destination(destination) => self.remove_destination(&destination.name),
                CacheEntity::DestinationCache(cache) => self.remove_destination(cache.destination_name()),
                CacheEntity::Host(host) => {
                    let _structure = self.structure.write();
                    for mut entry in self.destinations.iter_mut() {
                        entry.associations.remove(&host.name);
                    }
                }
                CacheEntity::SchedulerCache(scheduler) => {
                    self.with_entry(&scheduler.destination_name, |entry| {
                        entry.scheduler = None;
                    });
                }
            }
        }

        // Field-level change to one entry.  Missing entries are ignored;
        // the next resync picks up anything genuinely missing.

        fn with_entry<F>(&self, destination_name: &str, change: F)
        where
            F: FnOnce(&mut DestinationCache),
        {
            let _structure = self.structure.read();
            match self.destinations.get_mut(destination_name) {
                Some(mut entry) => change(entry.value_mut()),
                None => debug!("{} not in cache, change ignored", destination_name),
            }
        }

        // Hosts are shared, so a host update reaches every destination
        // that has an association with it.

        fn update_host(&self, host: Host) {
            let _structure = self.structure.write();
            let mut touched = 0;
            for mut entry in self.destinations.iter_mut() {
                if let Some(association) = entry.associations.get_mut(&host.name) {
                    association.host = host.clone();
                    touched += 1;
                }
            }
            debug!("Host {} updated in {} destination(s)", host.name, touched);
        }

        fn remove_destination(&self, destination_name: &str) {
            let _structure = self.structure.write();
            self.destinations.remove(destination_name);
        }
        ///
        /// Adopt a whole entry pushed by the master unless our copy is
        /// at least as new.  The local bad-transfer count survives.
        ///
        fn insert_destination_cache(&self, mut incoming: DestinationCache) {
            let name = String::from(incoming.destination_name());
            let _structure = self.structure.write();
            let local = self
                .destinations
                .get(&name)
                .map(|entry| (entry.creation_time, entry.bad_data_transfers_count));
            if let Some((creation_time, bad_count)) = local {
                if incoming.creation_time <= creation_time {
                    debug!("Pushed cache for {} is not newer than ours, ignored", name);
                    return;
                }
                incoming.bad_data_transfers_count = bad_count;
            }
            self.destinations.insert(name, incoming);
        }

        // -------------------------------------------------------------
        // Resync

        ///
        /// Fetch a full snapshot from ```source``` and install it.
        /// Resyncs never overlap.
        ///
        pub fn resync_all(&self, source: &dyn SnapshotSource) -> Result<ResyncReport, CacheError> {
            let _serial = self.resyncing.lock();
            let snapshot = source.fetch_snapshot()?;
            Ok(self.install_snapshot(snapshot))
        }
        ///
        /// Merge a snapshot into the cache:
        ///
        /// *  destinations - the set is replaced by the snapshot's; for
        /// each one a strictly newer local entry wins, otherwise the
        /// snapshot entry is taken with the local bad-transfer count.
        /// *  category/URLs - replaced.
        /// *  accounting users - replaced by those referenced from the
        /// snapshot's destinations.
        ///
        /// The first install marks the cache ready.
        ///
        pub fn install_snapshot(&self, snapshot: Snapshot) -> ResyncReport {
            let Snapshot {
                destinations,
                cat_urls,
            } = snapshot;
            let mut report = ResyncReport {
                destinations: destinations.len(),
                cat_urls: cat_urls.len(),
                ..ResyncReport::default()
            };
            let mut users = HashMap::new();
            for cache in destinations.values() {
                if let Some(user) = &cache.destination.user {
                    users.insert(user.name.clone(), user.clone());
                }
            }
            report.users = users.len();

            let start = Instant::now();
            {
                let _structure = self.structure.write();
                let mut merged: Vec<DestinationCache> = Vec::with_capacity(destinations.len());
                for (_, mut incoming) in destinations {
                    let local = self
                        .destinations
                        .get(incoming.destination_name())
                        .map(|entry| entry.value().clone());
                    match local {
                        Some(local) if local.creation_time > incoming.creation_time => {
                            debug!(
                                "Keep current destination cache for destination {}",
                                local.destination_name()
                            );
                            report.kept_local += 1;
                            merged.push(local);
                        }
                        Some(local) => {
                            incoming.bad_data_transfers_count = local.bad_data_transfers_count;
                            merged.push(incoming);
                        }
                        None => merged.push(incoming),
                    }
                }
                self.destinations.clear();
                for cache in merged {
                    self.destinations
                        .insert(String::from(cache.destination_name()), cache);
                }
            }
            info!(
                "Destination cache(s) updated with {} element(s) in {:?}",
                report.destinations,
                start.elapsed()
            );

            let start = Instant::now();
            *self.cat_urls.write() = cat_urls;
            info!(
                "CatUrl(s) updated with {} element(s) in {:?}",
                report.cat_urls,
                start.elapsed()
            );

            let start = Instant::now();
            *self.users.write() = users;
            info!(
                "Accounting user(s) updated with {} element(s) in {:?}",
                report.users,
                start.elapsed()
            );

            if !self.ready.swap(true, Ordering::SeqCst) {
                info!("Metadata cache is now ready");
            }
            report
        }
    }

    impl PushSink for MetadataCache {
        fn notify(&self, notification: Notification) {
            self.apply(notification);
        }
    }


    #[cfg(test)]
    mod cache_test {
        use super::fixtures::*;
        use super::*;
        use std::sync::atomic::AtomicUsize;
        use std::sync::Arc;
        use std::thread;
        use std::time::Duration;

        struct Fixed(Snapshot);
        impl SnapshotSource for Fixed {
            fn fetch_snapshot(&self) -> Result<Snapshot, CacheError> {
                Ok(self.0.clone())
            }
        }
        struct Down;
        impl SnapshotSource for Down {
            fn fetch_snapshot(&self) -> Result<Snapshot, CacheError> {
                Err(CacheError::Connection(ConnectionError::NotInitialized(String::from("Master"))))
            }
        }

        fn ready_cache(entries: Vec<DestinationCache>) -> MetadataCache {
            let cache = MetadataCache::new(true);
            cache.install_snapshot(snapshot(entries));
            cache
        }

        #[test]
        fn reads_fail_until_first_resync() {
            let cache = MetadataCache::new(true);
            assert!(matches!(cache.get("X"), Err(CacheError::NotReady)));
            assert!(matches!(cache.get_cat_urls(), Err(CacheError::NotReady)));
            assert!(cache.resync_all(&Down).is_err());
            assert!(!cache.is_ready());
            cache.resync_all(&Fixed(snapshot(vec![entry("X", 1)]))).unwrap();
            assert!(cache.is_ready());
            assert_eq!("X", cache.get("X").unwrap().destination_name());
            assert!(matches!(cache.get("Y"), Err(CacheError::NotInCache(_))));
        }
        #[test]
        fn disabled_cache_is_always_ready() {
            let cache = MetadataCache::new(false);
            assert!(cache.is_ready());
            assert!(matches!(cache.get("X"), Err(CacheError::NotInCache(_))));
        }
        #[test]
        fn newer_local_entry_survives_resync() {
            let cache = ready_cache(vec![]);
            cache.apply_insert(CacheEntity::DestinationCache(Box::new(entry("X", 100))));
            let report = cache.install_snapshot(snapshot(vec![entry("X", 50)]));
            assert_eq!(1, report.kept_local);
            assert_eq!(100, cache.get("X").unwrap().creation_time);
        }
        #[test]
        fn equal_or_older_local_entry_is_replaced_keeping_bad_count() {
            let cache = ready_cache(vec![entry("X", 100), entry("Y", 100)]);
            cache.set_bad_data_transfers_count("X", 7).unwrap();
            let mut fresh = entry("X", 100);
            fresh.destination.comment = String::from("from master");
            let report = cache.install_snapshot(snapshot(vec![fresh, entry("Y", 200)]));
            assert_eq!(0, report.kept_local);
            let x = cache.get("X").unwrap();
            assert_eq!("from master", x.destination.comment);
            assert_eq!(7, x.bad_data_transfers_count);
            assert_eq!(200, cache.get("Y").unwrap().creation_time);
        }
        #[test]
        fn resync_drops_destinations_missing_from_snapshot() {
            let cache = ready_cache(vec![entry("X", 1), entry("Y", 1)]);
            cache.install_snapshot(snapshot(vec![entry("X", 1)]));
            assert_eq!(1, cache.len());
            assert!(matches!(cache.get("Y"), Err(CacheError::NotInCache(_))));
        }
        #[test]
        fn resync_is_idempotent() {
            let h1 = host("h1", "10.0.0.1");
            let shared = snapshot(vec![
                entry("X", 10).with_association(association("X", h1.clone())),
                entry("Y", 20).with_association(association("Y", h1)),
            ]);
            let cache = MetadataCache::new(true);
            cache.resync_all(&Fixed(shared.clone())).unwrap();
            let first = (cache.get_all().unwrap(), cache.get_cat_urls().unwrap(), cache.get_user("X-owner").unwrap());
            cache.resync_all(&Fixed(shared)).unwrap();
            let second = (cache.get_all().unwrap(), cache.get_cat_urls().unwrap(), cache.get_user("X-owner").unwrap());
            assert_eq!(first, second);
        }
        #[test]
        fn users_and_cat_urls_replaced_wholesale() {
            let cache = ready_cache(vec![entry("X", 1)]);
            assert!(cache.get_user("X-owner").unwrap().is_some());
            let mut next = snapshot(vec![entry("Y", 1)]);
            next.cat_urls.clear();
            cache.install_snapshot(next);
            assert!(cache.get_user("X-owner").unwrap().is_none());
            assert!(cache.get_user("Y-owner").unwrap().is_some());
            assert!(cache.get_cat_urls().unwrap().is_empty());
        }
        #[test]
        fn host_update_reaches_every_referencing_destination() {
            let h1 = host("h1", "10.0.0.1");
            let h2 = host("h2", "10.0.0.2");
            let cache = ready_cache(vec![
                entry("A", 1).with_association(association("A", h1.clone())),
                entry("B", 1).with_association(association("B", h1.clone())),
                entry("C", 1).with_association(association("C", h2.clone())),
            ]);
            let moved = host("h1", "10.9.9.9");
            cache.apply_update(CacheEntity::Host(moved.clone()));
            assert_eq!(moved, cache.get("A").unwrap().associations["h1"].host);
            assert_eq!(moved, cache.get("B").unwrap().associations["h1"].host);
            assert_eq!(h2, cache.get("C").unwrap().associations["h2"].host);
            assert!(!cache.get("C").unwrap().associations.contains_key("h1"));
        }
        #[test]
        fn host_removal_drops_its_associations() {
            let h1 = host("h1", "10.0.0.1");
            let cache = ready_cache(vec![
                entry("A", 1).with_association(association("A", h1.clone())),
                entry("B", 1).with_association(association("B", h1.clone())),
            ]);
            cache.apply_remove(CacheEntity::Host(h1));
            assert!(cache.get("A").unwrap().associations.is_empty());
            assert!(cache.get("B").unwrap().associations.is_empty());
        }
        #[test]
        fn field_updates_touch_only_their_owner() {
            let cache = ready_cache(vec![entry("A", 1), entry("B", 1)]);
            cache.apply_insert(CacheEntity::Alias(Alias {
                destination_name: String::from("A"),
                alias_name: String::from("A2"),
                ..Alias::default()
            }));
            cache.apply_insert(CacheEntity::Association(association("A", host("h1", "x"))));
            let mut renamed = Destination::named("A");
            renamed.comment = String::from("updated");
            cache.apply_update(CacheEntity::Destination(renamed));
            let a = cache.get("A").unwrap();
            assert!(a.aliases.contains_key("A2"));
            assert!(a.associations.contains_key("h1"));
            assert_eq!("updated", a.destination.comment);
            let b = cache.get("B").unwrap();
            assert!(b.aliases.is_empty() && b.associations.is_empty());

            cache.apply_remove(CacheEntity::Alias(Alias {
                destination_name: String::from("A"),
                alias_name: String::from("A2"),
                ..Alias::default()
            }));
            cache.apply_remove(CacheEntity::Association(association("A", host("h1", "x"))));
            let a = cache.get("A").unwrap();
            assert!(a.aliases.is_empty() && a.associations.is_empty());
        }
        #[test]
        fn changes_to_missing_owner_are_ignored() {
            let cache = ready_cache(vec![entry("A", 1)]);
            cache.apply_update(CacheEntity::Association(association("Z", host("h1", "x"))));
            cache.apply_insert(CacheEntity::Destination(Destination::named("Z")));
            assert_eq!(1, cache.len());
            assert!(matches!(cache.set_bad_data_transfers_count("Z", 1), Err(CacheError::NotInCache(_))));
        }
        #[test]
        fn pushed_entry_must_be_strictly_newer() {
            let cache = ready_cache(vec![entry("X", 100)]);
            cache.set_bad_data_transfers_count("X", 3).unwrap();
            let mut same = entry("X", 100);
            same.destination.comment = String::from("same age");
            cache.apply_insert(CacheEntity::DestinationCache(Box::new(same)));
            assert_eq!("", cache.get("X").unwrap().destination.comment);
            let mut newer = entry("X", 101);
            newer.destination.comment = String::from("newer");
            cache.apply(Notification::Update(CacheEntity::DestinationCache(Box::new(newer))));
            let x = cache.get("X").unwrap();
            assert_eq!("newer", x.destination.comment);
            assert_eq!(3, x.bad_data_transfers_count);
        }
        #[test]
        fn destination_removal_is_structural() {
            let cache = ready_cache(vec![entry("A", 1), entry("B", 1)]);
            cache.notify(Notification::Remove(CacheEntity::Destination(Destination::named("A"))));
            assert!(matches!(cache.get("A"), Err(CacheError::NotInCache(_))));
            assert_eq!(1, cache.get_all().unwrap().len());
        }
        #[test]
        fn scheduler_cache_update_stamps_time() {
            let cache = ready_cache(vec![entry("A", 1)]);
            assert!(cache.get("A").unwrap().scheduler.is_none());
            cache.apply_update(CacheEntity::SchedulerCache(SchedulerCache {
                destination_name: String::from("A"),
                status: String::from("Running"),
                ..SchedulerCache::default()
            }));
            let a = cache.get("A").unwrap();
            assert_eq!("Running", a.scheduler.as_ref().unwrap().status);
            assert!(!a.is_scheduler_cache_expired(epoch_millis(), SCHEDULER_CACHE_FRESHNESS));
        }
        #[test]
        fn interleaved_pushes_never_lose_the_newest_entry() {
            // Pushes carry increasing creation times; resyncs replay a
            // stale snapshot.  The newest time must always win.
            let cache = ready_cache(vec![entry("X", 0)]);
            let stale = snapshot(vec![entry("X", 5)]);
            let mut newest = 0;
            for step in 1..=20 {
                if step % 3 == 0 {
                    cache.install_snapshot(stale.clone());
                    newest = newest.max(5);
                } else {
                    let time = step * 2;
                    cache.apply_insert(CacheEntity::DestinationCache(Box::new(entry("X", time))));
                    newest = newest.max(time);
                }
                assert_eq!(newest, cache.get("X").unwrap().creation_time);
            }
        }
        #[test]
        fn concurrent_pushes_survive_stale_resyncs() {
            const NAMES: [&str; 4] = ["A", "B", "C", "D"];
            const PUSHES: i64 = 300;
            let cache = Arc::new(MetadataCache::new(true));
            let stale = snapshot(NAMES.iter().map(|name| entry(name, 0)).collect());
            cache.install_snapshot(stale.clone());
            let pushing = Arc::new(AtomicUsize::new(NAMES.len()));

            let mut writers = Vec::new();
            for name in NAMES.iter().copied() {
                let cache = Arc::clone(&cache);
                let pushing = Arc::clone(&pushing);
                writers.push(thread::spawn(move || {
                    for time in 1..=PUSHES {
                        cache.apply_insert(CacheEntity::DestinationCache(Box::new(entry(name, time))));
                        cache.apply_update(CacheEntity::Association(association(name, host("h1", "10.0.0.1"))));
                    }
                    pushing.fetch_sub(1, Ordering::SeqCst);
                }));
            }
            {
                let cache = Arc::clone(&cache);
                let pushing = Arc::clone(&pushing);
                writers.push(thread::spawn(move || {
                    while pushing.load(Ordering::SeqCst) > 0 {
                        cache.install_snapshot(stale.clone());
                    }
                }));
            }
            // Creation times seen by a reader never go backwards and an
            // entry never vanishes mid-resync.
            let reader = {
                let cache = Arc::clone(&cache);
                let pushing = Arc::clone(&pushing);
                thread::spawn(move || {
                    let mut last = [0i64; 4];
                    while pushing.load(Ordering::SeqCst) > 0 {
                        for (seen, name) in last.iter_mut().zip(NAMES.iter()) {
                            let now = cache.get(name).map(|e| e.creation_time).unwrap_or(-1);
                            if now < *seen {
                                return false;
                            }
                            *seen = now;
                        }
                    }
                    true
                })
            };

            let (done, finished) = crossbeam::channel::bounded(1);
            thread::spawn(move || {
                let writers_ok = writers.into_iter().all(|w| w.join().is_ok());
                let _ = done.send(writers_ok && reader.join().unwrap_or(false));
            });
            assert_eq!(Ok(true), finished.recv_timeout(Duration::from_secs(30)));
            for name in NAMES.iter() {
                assert_eq!(PUSHES, cache.get(name).unwrap().creation_time);
            }
        }
    }
}
