pub mod task {
    use crossbeam::channel::{bounded, Receiver, RecvTimeoutError, Sender};
    use log::{debug, error, info};
    use parking_lot::Mutex;
    use std::io;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    struct StopState {
        stopped: AtomicBool,
        wakeup: Mutex<Option<Sender<()>>>,
        sleeper: Receiver<()>,
    }
    ///
    /// A request to stop, shared between the thread that runs and
    /// the threads that may want it to exit.  Nothing is ever sent on
    /// the channel; stopping drops the only sender so that every
    /// receiver blocked in ```sleep``` sees a disconnect immediately.
    ///
    #[derive(Clone)]
    pub struct StopSignal {
        state: Arc<StopState>,
    }

    impl StopSignal {
        pub fn new() -> StopSignal {
            let (sender, receiver) = bounded::<()>(0);
            StopSignal {
                state: Arc::new(StopState {
                    stopped: AtomicBool::new(false),
                    wakeup: Mutex::new(Some(sender)),
                    sleeper: receiver,
                }),
            }
        }
        /// Ask the owning thread(s) to stop.  Idempotent.
        pub fn stop(&self) {
            self.state.stopped.store(true, Ordering::SeqCst);
            self.state.wakeup.lock().take();
        }
        pub fn is_stopped(&self) -> bool {
            self.state.stopped.load(Ordering::SeqCst)
        }
        ///
        /// Sleep for up to ```duration```.  Returns true if the
        /// full duration elapsed and we should keep running, false if
        /// a stop was requested before or during the sleep.
        ///
        pub fn sleep(&self, duration: Duration) -> bool {
            if self.is_stopped() {
                return false;
            }
            match self.state.sleeper.recv_timeout(duration) {
                Err(RecvTimeoutError::Timeout) => !self.is_stopped(),
                _ => false,
            }
        }
    }

    impl Default for StopSignal {
        fn default() -> StopSignal {
            StopSignal::new()
        }
    }
    ///
    /// A named background thread that runs ```body``` once per
    /// period.  The first run happens as soon as the thread starts.
    ///
    pub struct PeriodicTask {
        name: String,
        stop: StopSignal,
        handle: Option<thread::JoinHandle<()>>,
    }

    impl PeriodicTask {
        pub fn spawn<F>(name: &str, period: Duration, mut body: F) -> io::Result<PeriodicTask>
        where
            F: FnMut() + Send + 'static,
        {
            let stop = StopSignal::new();
            let thread_stop = stop.clone();
            let thread_name = String::from(name);
            let handle = thread::Builder::new()
                .name(String::from(name))
                .spawn(move || {
                    debug!("{} started (period {:?})", thread_name, period);
                    loop {
                        body();
                        if !thread_stop.sleep(period) {
                            break;
                        }
                    }
                    info!("{} stopped", thread_name);
                })?;
            Ok(PeriodicTask {
                name: String::from(name),
                stop,
                handle: Some(handle),
            })
        }
        pub fn name(&self) -> &str {
            &self.name
        }
        pub fn is_stopped(&self) -> bool {
            self.stop.is_stopped()
        }
        ///
        /// Stop the task and wait for the thread to exit.  A run of
        /// the body that is already in progress is allowed to finish.
        ///
        pub fn stop(&mut self) {
            self.stop.stop();
            if let Some(handle) = self.handle.take() {
                if handle.join().is_err() {
                    error!("{} panicked", self.name);
                }
            }
        }
    }

    impl Drop for PeriodicTask {
        fn drop(&mut self) {
            self.stop.stop();
        }
    }

    #[cfg(test)]
    mod task_test {
        use super::*;
        use std::sync::atomic::AtomicUsize;
        use std::time::Instant;

        #[test]
        fn sleep_runs_full_duration() {
            let stop = StopSignal::new();
            let start = Instant::now();
            assert!(stop.sleep(Duration::from_millis(20)));
            assert!(start.elapsed() >= Duration::from_millis(20));
        }
        #[test]
        fn stop_wakes_sleeper() {
            let stop = StopSignal::new();
            let other = stop.clone();
            let sleeper = thread::spawn(move || {
                let start = Instant::now();
                let completed = other.sleep(Duration::from_secs(30));
                (completed, start.elapsed())
            });
            thread::sleep(Duration::from_millis(20));
            stop.stop();
            let (completed, elapsed) = sleeper.join().unwrap();
            assert!(!completed);
            assert!(elapsed < Duration::from_secs(5));
        }
        #[test]
        fn stopped_signal_never_sleeps() {
            let stop = StopSignal::new();
            stop.stop();
            stop.stop();
            assert!(stop.is_stopped());
            assert!(!stop.sleep(Duration::from_secs(30)));
        }
        #[test]
        fn periodic_task_repeats_until_stopped() {
            let runs = Arc::new(AtomicUsize::new(0));
            let counter = runs.clone();
            let mut task = PeriodicTask::spawn("test-periodic", Duration::from_millis(5), move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
            let deadline = Instant::now() + Duration::from_secs(5);
            while runs.load(Ordering::SeqCst) < 3 && Instant::now() < deadline {
                thread::sleep(Duration::from_millis(5));
            }
            task.stop();
            let after_stop = runs.load(Ordering::SeqCst);
            assert!(after_stop >= 3);
            thread::sleep(Duration::from_millis(30));
            assert_eq!(after_stop, runs.load(Ordering::SeqCst));
            assert!(task.is_stopped());
        }
    }
}
