pub mod channel {
    use std::hash::{Hash, Hasher};
    use std::io::{self, Cursor, Read, Write};
    use std::net::{Shutdown, TcpStream};
    use std::sync::Arc;

    ///
    /// Extension points invoked around every blocking operation of a
    /// CancellableChannel.  Both have do-nothing defaults.
    ///
    pub trait IoHooks: Send + Sync {
        fn before_blocking_op(&self) -> io::Result<()> {
            Ok(())
        }
        fn after_blocking_op(&self) {}
    }

    /// Hooks that do nothing at all.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct NoHooks;
    impl IoHooks for NoHooks {}

    impl<H: IoHooks + ?Sized> IoHooks for Arc<H> {
        fn before_blocking_op(&self) -> io::Result<()> {
            (**self).before_blocking_op()
        }
        fn after_blocking_op(&self) {
            (**self).after_blocking_op()
        }
    }
    ///
    /// A bidirectional byte stream that can also be closed.  Closing
    /// must not block.
    ///
    pub trait Transport: Read + Write {
        fn close(&mut self) -> io::Result<()>;
    }

    impl Transport for TcpStream {
        fn close(&mut self) -> io::Result<()> {
            match self.shutdown(Shutdown::Both) {
                Err(e) if e.kind() != io::ErrorKind::NotConnected => Err(e),
                _ => Ok(()),
            }
        }
    }

    impl Transport for Cursor<Vec<u8>> {
        fn close(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    // Calls after_blocking_op when dropped so the hook runs even if
    // the operation unwinds.

    struct AfterGuard<'a, H: IoHooks>(&'a H);
    impl<'a, H: IoHooks> Drop for AfterGuard<'a, H> {
        fn drop(&mut self) {
            self.0.after_blocking_op();
        }
    }
    ///
    /// Wraps one transport and brackets every blocking operation with
    /// the hooks.  The wrapped stream and the hooks are fixed at
    /// construction.  ```close``` bypasses the hooks entirely and
    /// is idempotent.
    ///
    pub struct CancellableChannel<S: Transport, H: IoHooks> {
        inner: S,
        hooks: H,
        closed: bool,
    }

    impl<S: Transport, H: IoHooks> CancellableChannel<S, H> {
        pub fn new(inner: S, hooks: H) -> CancellableChannel<S, H> {
            CancellableChannel {
                inner,
                hooks,
                closed: false,
            }
        }
        pub fn get_ref(&self) -> &S {
            &self.inner
        }
        pub fn hooks(&self) -> &H {
            &self.hooks
        }
        pub fn is_closed(&self) -> bool {
            self.closed
        }
        /// True if both sides are this very channel object.
        pub fn same_channel(&self, other: &CancellableChannel<S, H>) -> bool {
            std::ptr::eq(self, other)
        }

        // Run one blocking operation between the hooks.  If the
        // before hook refuses, the operation never starts and the
        // after hook is not called.

        fn guarded<T, F>(&mut self, op: F) -> io::Result<T>
        where
            F: FnOnce(&mut S) -> io::Result<T>,
        {
            let CancellableChannel { inner, hooks, .. } = self;
            hooks.before_blocking_op()?;
            let _after = AfterGuard(&*hooks);
            op(inner)
        }
        ///
        /// Read and discard up to ```count``` bytes.  Returns the
        /// number of bytes actually skipped, which is short only at
        /// end of stream.
        ///
        pub fn skip(&mut self, count: u64) -> io::Result<u64> {
            self.guarded(|inner| io::copy(&mut inner.take(count), &mut io::sink()))
        }
        ///
        /// Close the underlying transport without consulting the
        /// hooks.  Closing more than once is harmless.
        ///
        pub fn close(&mut self) -> io::Result<()> {
            if self.closed {
                return Ok(());
            }
            self.closed = true;
            self.inner.close()
        }
    }

    impl<S: Transport, H: IoHooks> Read for CancellableChannel<S, H> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.guarded(|inner| inner.read(buf))
        }
        fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
            self.guarded(|inner| inner.read_exact(buf))
        }
    }

    impl<S: Transport, H: IoHooks> Write for CancellableChannel<S, H> {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.guarded(|inner| inner.write(buf))
        }
        fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
            self.guarded(|inner| inner.write_all(buf))
        }
        fn flush(&mut self) -> io::Result<()> {
            self.guarded(|inner| inner.flush())
        }
    }

    // Equality and hashing follow the wrapped stream when it has them.

    impl<S: Transport + PartialEq, H: IoHooks> PartialEq for CancellableChannel<S, H> {
        fn eq(&self, other: &Self) -> bool {
            self.inner == other.inner
        }
    }
    impl<S: Transport + Eq, H: IoHooks> Eq for CancellableChannel<S, H> {}

    impl<S: Transport + Hash, H: IoHooks> Hash for CancellableChannel<S, H> {
        fn hash<T: Hasher>(&self, state: &mut T) {
            self.inner.hash(state)
        }
    }

    #[cfg(test)]
    mod channel_test {
        use super::*;
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Mutex;

        #[derive(Default)]
        struct Recorder {
            events: Mutex<Vec<&'static str>>,
            refuse: AtomicUsize,
        }
        impl IoHooks for Recorder {
            fn before_blocking_op(&self) -> io::Result<()> {
                self.events.lock().unwrap().push("before");
                if self.refuse.load(Ordering::SeqCst) > 0 {
                    return Err(io::Error::new(io::ErrorKind::ConnectionAborted, "refused"));
                }
                Ok(())
            }
            fn after_blocking_op(&self) {
                self.events.lock().unwrap().push("after");
            }
        }
        // A transport whose reads always fail and that counts closes.
        #[derive(Default, PartialEq, Eq, Hash)]
        struct Broken {
            closes: usize,
        }
        impl Read for Broken {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
            }
        }
        impl Write for Broken {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                Ok(buf.len())
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }
        impl Transport for Broken {
            fn close(&mut self) -> io::Result<()> {
                self.closes += 1;
                Ok(())
            }
        }

        #[test]
        fn hooks_bracket_each_operation() {
            let recorder = Arc::new(Recorder::default());
            let mut channel = CancellableChannel::new(Cursor::new(b"abcdef".to_vec()), recorder.clone());
            let mut buf = [0u8; 2];
            channel.read_exact(&mut buf).unwrap();
            channel.write_all(b"xy").unwrap();
            channel.flush().unwrap();
            assert_eq!(
                vec!["before", "after", "before", "after", "before", "after"],
                *recorder.events.lock().unwrap()
            );
            assert_eq!(b"ab", &buf);
        }
        #[test]
        fn after_hook_runs_on_failure() {
            let recorder = Arc::new(Recorder::default());
            let mut channel = CancellableChannel::new(Broken::default(), recorder.clone());
            let mut buf = [0u8; 4];
            assert!(channel.read(&mut buf).is_err());
            assert_eq!(vec!["before", "after"], *recorder.events.lock().unwrap());
        }
        #[test]
        fn refused_operation_never_reaches_stream() {
            let recorder = Arc::new(Recorder::default());
            recorder.refuse.store(1, Ordering::SeqCst);
            let mut channel = CancellableChannel::new(Cursor::new(b"abc".to_vec()), recorder.clone());
            let mut buf = [0u8; 3];
            let err = channel.read(&mut buf).unwrap_err();
            assert_eq!(io::ErrorKind::ConnectionAborted, err.kind());
            assert_eq!(0, channel.get_ref().position());
            assert_eq!(vec!["before"], *recorder.events.lock().unwrap());
        }
        #[test]
        fn skip_discards_bytes() {
            let mut channel = CancellableChannel::new(Cursor::new(b"0123456789".to_vec()), NoHooks);
            assert_eq!(4, channel.skip(4).unwrap());
            let mut rest = String::new();
            channel.read_to_string(&mut rest).unwrap();
            assert_eq!("456789", rest);
            assert_eq!(0, channel.skip(10).unwrap());
        }
        #[test]
        fn close_is_idempotent_and_hookless() {
            let recorder = Arc::new(Recorder::default());
            let mut channel = CancellableChannel::new(Broken::default(), recorder.clone());
            channel.close().unwrap();
            channel.close().unwrap();
            assert!(channel.is_closed());
            assert_eq!(1, channel.get_ref().closes);
            assert!(recorder.events.lock().unwrap().is_empty());
        }
        #[test]
        fn equality_follows_stream() {
            let a = CancellableChannel::new(Broken::default(), NoHooks);
            let b = CancellableChannel::new(Broken::default(), NoHooks);
            assert!(a == b);
            assert!(a.same_channel(&a));
            assert!(!a.same_channel(&b));
        }
    }
}
