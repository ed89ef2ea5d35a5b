//! Multi-threaded backend: real OS threads over `std::thread`, a re-armable
//! barrier over `parking_lot::{Mutex, Condvar}`, and Linux CPU-affinity
//! pinning for worker threads.

use parking_lot::{Condvar, Mutex};

pub type JoinHandle = std::thread::JoinHandle<()>;

pub fn spawn<F: FnOnce() + Send + 'static>(f: F) -> JoinHandle {
    std::thread::spawn(f)
}

/// Fallible spawn used by `engine::init`, which must roll back cleanly if the
/// OS refuses to create a worker thread (resource exhaustion).
pub fn try_spawn<F: FnOnce() + Send + 'static>(f: F) -> std::io::Result<JoinHandle> {
    std::thread::Builder::new().name("aot-worker".into()).spawn(f)
}

pub fn join(handle: JoinHandle) {
    let _ = handle.join();
}

/// Pins the calling thread to one CPU. Pinning is a scheduling hint, not a
/// correctness requirement, so failures are ignored.
#[cfg(target_os = "linux")]
pub fn pin_current_thread(cpu: usize) {
    // SAFETY: `pthread_self()` returns the calling thread's own handle;
    // `set` is a stack-local `cpu_set_t` fully initialized by `CPU_ZERO`
    // before any `CPU_SET` call. No pointer outlives this function.
    unsafe {
        let mut set: libc::cpu_set_t = std::mem::zeroed();
        libc::CPU_ZERO(&mut set);
        libc::CPU_SET(cpu % (libc::CPU_SETSIZE as usize), &mut set);
        libc::pthread_setaffinity_np(
            libc::pthread_self(),
            std::mem::size_of::<libc::cpu_set_t>(),
            &set,
        );
    }
}

#[cfg(not(target_os = "linux"))]
pub fn pin_current_thread(_cpu: usize) {}

/// Re-armable counting barrier: one thread calls `sync`, many call `arrive`.
/// Distinct from `std::sync::Barrier`, which has no single-waiter/many-arriver
/// asymmetry and cannot be reset mid-life.
pub struct Barrier {
    state: Mutex<BarrierState>,
    cond: Condvar,
}

struct BarrierState {
    target: usize,
    count: usize,
}

impl Barrier {
    pub fn new() -> Self {
        Barrier {
            state: Mutex::new(BarrierState { target: 0, count: 0 }),
            cond: Condvar::new(),
        }
    }

    /// Restarts the barrier from zero with a new arrival target. Must be
    /// called only while no thread is inside `sync` for the previous arming.
    pub fn reset(&self, target: usize) {
        let mut state = self.state.lock();
        state.target = target;
        state.count = 0;
    }

    /// Called concurrently by many arriving threads.
    pub fn arrive(&self) {
        let mut state = self.state.lock();
        state.count += 1;
        if state.count >= state.target {
            self.cond.notify_one();
        }
    }

    /// Blocks until `count >= target`. Exactly one thread per arming may call
    /// this.
    pub fn sync(&self) {
        let mut state = self.state.lock();
        while state.count < state.target {
            self.cond.wait(&mut state);
        }
    }
}

impl Default for Barrier {
    fn default() -> Self {
        Self::new()
    }
}
