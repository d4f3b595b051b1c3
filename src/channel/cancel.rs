pub mod cancel {
    use crate::channel::IoHooks;
    use crate::task::StopSignal;
    use log::{debug, warn};
    use parking_lot::Mutex;
    use std::io;
    use std::net::{Shutdown, TcpStream};
    use std::sync::{Arc, Weak};
    use std::thread;
    use std::time::{Duration, Instant};

    ///
    /// Something that can shut a connection down from a thread other
    /// than the one using it.
    ///
    pub trait ShutdownHandle: Send + Sync {
        fn shutdown_now(&self);
    }

    impl ShutdownHandle for TcpStream {
        fn shutdown_now(&self) {
            // Already-closed sockets report NotConnected, which is fine.
            let _ = self.shutdown(Shutdown::Both);
        }
    }

    #[derive(Default)]
    struct TokenState {
        cancelled: bool,
        in_io: bool,
        deadline: Option<Instant>,
        target: Option<Arc<dyn ShutdownHandle>>,
    }
    ///
    /// Cancellation token and deadline for one channel.  Used as the
    /// channel's IoHooks:
    ///
    /// *  Before an operation, a cancelled token refuses with
    /// ```ConnectionAborted``` and an expired deadline refuses with
    /// ```TimedOut```.  Neither kind is retried by std's buffered
    /// readers, so a refusal always ends the operation.  Otherwise the token notes that a blocking call
    /// is in progress.
    /// *  After the operation the in-progress mark is cleared.
    ///
    /// ```cancel``` closes the bound transport if, and only if, a
    /// blocking call is in progress; otherwise the next operation is
    /// simply refused.  Once cancelled a token stays cancelled.
    ///
    #[derive(Clone, Default)]
    pub struct CancelToken {
        state: Arc<Mutex<TokenState>>,
    }

    impl CancelToken {
        pub fn new() -> CancelToken {
            CancelToken::default()
        }
        /// Sets the handle used to close the transport on cancel.
        pub fn bind(&self, target: Arc<dyn ShutdownHandle>) {
            self.state.lock().target = Some(target);
        }
        pub fn set_deadline(&self, deadline: Option<Instant>) {
            self.state.lock().deadline = deadline;
        }
        pub fn deadline(&self) -> Option<Instant> {
            self.state.lock().deadline
        }
        pub fn is_cancelled(&self) -> bool {
            self.state.lock().cancelled
        }
        pub fn in_blocking_op(&self) -> bool {
            self.state.lock().in_io
        }
        pub fn cancel(&self) {
            // Take the handle out under the lock, close outside it.
            let target = {
                let mut state = self.state.lock();
                state.cancelled = true;
                if state.in_io {
                    state.target.clone()
                } else {
                    None
                }
            };
            match target {
                Some(target) => {
                    debug!("Cancelling a channel parked in a blocking call");
                    target.shutdown_now();
                }
                None => debug!("Cancelling a channel that is not in a blocking call"),
            }
        }
        ///
        /// Cancel the token if a blocking call is in progress and its
        /// deadline is at or before ```now```.  Returns true if the
        /// token was cancelled by this call.
        ///
        pub fn expire_if_overdue(&self, now: Instant) -> bool {
            let overdue = {
                let state = self.state.lock();
                !state.cancelled
                    && state.in_io
                    && state.deadline.map(|d| d <= now).unwrap_or(false)
            };
            if overdue {
                self.cancel();
            }
            overdue
        }
        fn downgrade(&self) -> Weak<Mutex<TokenState>> {
            Arc::downgrade(&self.state)
        }
    }

    impl IoHooks for CancelToken {
        fn before_blocking_op(&self) -> io::Result<()> {
            let mut state = self.state.lock();
            if state.cancelled {
                return Err(io::Error::new(
                    io::ErrorKind::ConnectionAborted,
                    "channel operation cancelled",
                ));
            }
            if let Some(deadline) = state.deadline {
                if deadline <= Instant::now() {
                    return Err(io::Error::new(
                        io::ErrorKind::TimedOut,
                        "channel deadline elapsed",
                    ));
                }
            }
            state.in_io = true;
            Ok(())
        }
        fn after_blocking_op(&self) {
            self.state.lock().in_io = false;
        }
    }
    ///
    /// Background thread that closes the transport under any blocking
    /// call that outlives its token's deadline.  Tokens are held weakly
    /// so a dropped channel falls out of the sweep on its own.
    ///
    pub struct Watchdog {
        tokens: Arc<Mutex<Vec<Weak<Mutex<TokenState>>>>>,
        stop: StopSignal,
        handle: Option<thread::JoinHandle<()>>,
    }

    impl Watchdog {
        pub fn start(tick: Duration) -> io::Result<Watchdog> {
            let tokens: Arc<Mutex<Vec<Weak<Mutex<TokenState>>>>> = Arc::new(Mutex::new(Vec::new()));
            let stop = StopSignal::new();
            let swept = tokens.clone();
            let thread_stop = stop.clone();
            let handle = thread::Builder::new()
                .name(String::from("channel-watchdog"))
                .spawn(move || {
                    while thread_stop.sleep(tick) {
                        Self::sweep_tokens(&swept, Instant::now());
                    }
                })?;
            Ok(Watchdog {
                tokens,
                stop,
                handle: Some(handle),
            })
        }
        pub fn watch(&self, token: &CancelToken) {
            self.tokens.lock().push(token.downgrade());
        }
        /// Number of live tokens under watch.
        pub fn watched(&self) -> usize {
            self.tokens.lock().iter().filter(|t| t.strong_count() > 0).count()
        }
        /// Run one sweep immediately; returns how many calls were cut.
        pub fn sweep(&self, now: Instant) -> usize {
            Self::sweep_tokens(&self.tokens, now)
        }

        fn sweep_tokens(tokens: &Mutex<Vec<Weak<Mutex<TokenState>>>>, now: Instant) -> usize {
            let live: Vec<CancelToken> = {
                let mut tokens = tokens.lock();
                tokens.retain(|t| t.strong_count() > 0);
                tokens
                    .iter()
                    .filter_map(|t| t.upgrade())
                    .map(|state| CancelToken { state })
                    .collect()
            };
            let mut expired = 0;
            for token in live {
                if token.expire_if_overdue(now) {
                    warn!("Closing transport under a blocking call past its deadline");
                    expired += 1;
                }
            }
            expired
        }

        pub fn stop(&mut self) {
            self.stop.stop();
            if let Some(handle) = self.handle.take() {
                let _ = handle.join();
            }
        }
    }

    impl Drop for Watchdog {
        fn drop(&mut self) {
            self.stop.stop();
        }
    }

}
