//! Platform primitives: mutex, condition variable, re-armable barrier, and
//! thread handle, behind two compile-time-selected backends.
//!
//! Mutex and condition variable are not duplicated per backend — `parking_lot`'s
//! types already degenerate to an uncontended lock/no-wait in the single-threaded
//! build, the same way the teacher's hot-path code reaches for `parking_lot`
//! rather than a hand-rolled spinlock. Only thread-spawn and the barrier
//! actually differ between a real OS thread pool and an inline stub, so only
//! those are split into `posix`/`single`.

pub use parking_lot::{Condvar, Mutex, MutexGuard};

#[cfg(feature = "port-posix")]
mod posix;
#[cfg(feature = "port-posix")]
pub use posix::{join, pin_current_thread, spawn, try_spawn, Barrier, JoinHandle};

#[cfg(all(feature = "port-single", not(feature = "port-posix")))]
mod single;
#[cfg(all(feature = "port-single", not(feature = "port-posix")))]
pub use single::{join, pin_current_thread, spawn, try_spawn, Barrier, JoinHandle};
