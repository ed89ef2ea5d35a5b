//! Single-threaded backend. Grounded directly on the documented behavior of
//! the C source's `tvmrt_port_single.c`: every primitive is a trivial
//! success, and a "thread" runs its entry point inline instead of forking.
//!
//! The engine never actually calls `spawn` in this build — `engine::init`
//! keeps the worker pool empty and `engine::run` is re-exported as
//! `run_single` — so these exist for API symmetry with the posix backend,
//! not because anything in this crate schedules onto them.

use std::sync::atomic::{AtomicUsize, Ordering};

pub struct JoinHandle;

pub fn spawn<F: FnOnce() + Send + 'static>(f: F) -> JoinHandle {
    f();
    JoinHandle
}

pub fn try_spawn<F: FnOnce() + Send + 'static>(f: F) -> std::io::Result<JoinHandle> {
    f();
    Ok(JoinHandle)
}

pub fn join(_handle: JoinHandle) {}

pub fn pin_current_thread(_cpu: usize) {}

/// A barrier whose `arrive`/`sync` never block: in the single-threaded
/// backend there is only ever one thread, so synchronization has already
/// happened by construction.
pub struct Barrier {
    target: AtomicUsize,
    count: AtomicUsize,
}

impl Barrier {
    pub fn new() -> Self {
        Barrier {
            target: AtomicUsize::new(0),
            count: AtomicUsize::new(0),
        }
    }

    pub fn reset(&self, target: usize) {
        self.target.store(target, Ordering::Relaxed);
        self.count.store(0, Ordering::Relaxed);
    }

    pub fn arrive(&self) {
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn sync(&self) {}
}

impl Default for Barrier {
    fn default() -> Self {
        Self::new()
    }
}
