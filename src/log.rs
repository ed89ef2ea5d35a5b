//! Fixed-capacity ring of structured operator-event records.
//!
//! Distinct from the ambient `tracing` calls the engine emits for lifecycle
//! events (init/shutdown) — this ring is the per-operator record the
//! original spec calls out for zero-alloc hot-path logging, and it disables
//! to nothing at compile time when the `log-enable` feature is off.

/// Sentinel distinguishing inline (main-thread) execution from a real
/// worker thread, per the boundary case "layer of one operator executes
/// inline... worker ids in logs are the main-thread sentinel".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerId {
    Main,
    Worker(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

/// Record strings are references, not owned copies — op names come from
/// `&'static str` operator descriptors, which outlive the log.
#[derive(Debug, Clone, Copy)]
pub struct LogRecord {
    pub op_id: u32,
    pub op_name: &'static str,
    pub worker_id: WorkerId,
    pub return_code: i32,
    pub level: LogLevel,
}

pub type LogCallback = fn(&LogRecord);

#[cfg(feature = "log-enable")]
mod ring {
    use super::{LogCallback, LogRecord};
    use parking_lot::Mutex;

    struct Inner {
        buf: Vec<Option<LogRecord>>,
        head: usize,
        count: usize,
        callback: Option<LogCallback>,
    }

    pub struct LogSink {
        inner: Mutex<Inner>,
    }

    impl LogSink {
        pub fn new(capacity: usize) -> Self {
            let capacity = capacity.max(1);
            LogSink {
                inner: Mutex::new(Inner {
                    buf: vec![None; capacity],
                    head: 0,
                    count: 0,
                    callback: None,
                }),
            }
        }

        pub fn set_callback(&self, cb: LogCallback) {
            self.inner.lock().callback = Some(cb);
        }

        /// Invokes the callback (if any), then writes to the ring, overwriting
        /// the oldest record once full.
        pub fn push(&self, record: LogRecord) {
            let mut inner = self.inner.lock();
            if let Some(cb) = inner.callback {
                cb(&record);
            }
            let cap = inner.buf.len();
            let count = inner.count;
            let head = inner.head;
            let write_at = (head + count) % cap;
            if count == cap {
                inner.head = (head + 1) % cap;
            } else {
                inner.count += 1;
            }
            inner.buf[write_at] = Some(record);
        }

        /// Drains oldest-first.
        pub fn pop(&self) -> Option<LogRecord> {
            let mut inner = self.inner.lock();
            if inner.count == 0 {
                return None;
            }
            let head = inner.head;
            let record = inner.buf[head].take();
            inner.head = (head + 1) % inner.buf.len();
            inner.count -= 1;
            record
        }

        pub fn count(&self) -> usize {
            self.inner.lock().count
        }

        pub fn clear(&self) {
            let mut inner = self.inner.lock();
            inner.head = 0;
            inner.count = 0;
            for slot in inner.buf.iter_mut() {
                *slot = None;
            }
        }
    }
}

#[cfg(feature = "log-enable")]
pub use ring::LogSink as Log;

#[cfg(not(feature = "log-enable"))]
mod null {
    use super::{LogCallback, LogRecord};

    /// Every method is a no-op that the optimizer can remove entirely;
    /// compiling without `log-enable` costs nothing at call sites.
    pub struct LogSink;

    impl LogSink {
        #[inline(always)]
        pub fn new(_capacity: usize) -> Self {
            LogSink
        }

        #[inline(always)]
        pub fn set_callback(&self, _cb: LogCallback) {}

        #[inline(always)]
        pub fn push(&self, _record: LogRecord) {}

        #[inline(always)]
        pub fn pop(&self) -> Option<LogRecord> {
            None
        }

        #[inline(always)]
        pub fn count(&self) -> usize {
            0
        }

        #[inline(always)]
        pub fn clear(&self) {}
    }
}

#[cfg(not(feature = "log-enable"))]
pub use null::LogSink as Log;

#[cfg(test)]
#[cfg(feature = "log-enable")]
mod tests {
    use super::*;

    fn rec(id: u32) -> LogRecord {
        LogRecord {
            op_id: id,
            op_name: "test_op",
            worker_id: WorkerId::Main,
            return_code: 0,
            level: LogLevel::Info,
        }
    }

    #[test]
    fn round_trip_fifo() {
        let log = Log::new(4);
        log.push(rec(1));
        log.push(rec(2));
        log.push(rec(3));
        assert_eq!(log.count(), 3);
        assert_eq!(log.pop().unwrap().op_id, 1);
        assert_eq!(log.pop().unwrap().op_id, 2);
        assert_eq!(log.pop().unwrap().op_id, 3);
        assert!(log.pop().is_none());
    }

    #[test]
    fn ring_overwrite() {
        let log = Log::new(3);
        for i in 0..(3 + 2) {
            log.push(rec(i));
        }
        // capacity 3, pushed 5 (k=2): next pop should be the (k+1)=3rd pushed record (id 2)
        assert_eq!(log.pop().unwrap().op_id, 2);
        assert_eq!(log.pop().unwrap().op_id, 3);
        assert_eq!(log.pop().unwrap().op_id, 4);
        assert!(log.pop().is_none());
    }

    #[test]
    fn clear_empties_ring() {
        let log = Log::new(4);
        log.push(rec(1));
        log.clear();
        assert_eq!(log.count(), 0);
        assert!(log.pop().is_none());
    }
}
