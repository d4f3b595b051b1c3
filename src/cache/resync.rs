pub mod resync {
    use crate::cache::{MetadataCache, SnapshotSource};
    use crate::task::PeriodicTask;
    use log::{debug, warn};
    use std::io;
    use std::sync::Arc;
    use std::time::Duration;

    /// Default period between full resyncs.
    pub const RESYNC_PERIOD: Duration = Duration::from_secs(30);

    ///
    /// Background thread that resyncs a MetadataCache from a
    /// SnapshotSource every period, starting immediately.  A failed
    /// resync is logged and retried at the next period; the cache
    /// keeps what it had.
    ///
    pub struct ResyncTask {
        task: PeriodicTask,
    }

    impl ResyncTask {
        pub fn start(
            cache: Arc<MetadataCache>,
            source: Arc<dyn SnapshotSource>,
            period: Duration,
        ) -> io::Result<ResyncTask> {
            let task = PeriodicTask::spawn("metadata-resync", period, move || {
                match cache.resync_all(source.as_ref()) {
                    Ok(report) => debug!("Resync done: {:?}", report),
                    Err(e) => warn!("Resync failed, keeping current metadata: {}", e),
                }
            })?;
            Ok(ResyncTask { task })
        }
        pub fn is_stopped(&self) -> bool {
            self.task.is_stopped()
        }
        pub fn stop(&mut self) {
            self.task.stop();
        }
    }

}
