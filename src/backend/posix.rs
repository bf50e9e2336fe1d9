//! POSIX-threads backend.
//!
//! Mutual exclusion and counting are built on `parking_lot` mutex/condvar
//! pairs, which gives millisecond-or-infinite timed waits without poisoning.
//! Threads are native OS threads spawned through `std::thread::Builder`;
//! the five OSAL priority classes are interpolated onto the `SCHED_RR`
//! priority range and applied best-effort (an unprivileged process may not
//! be allowed to raise its round-robin priority, which is not an error).

#![allow(unsafe_code)] // libc scheduler calls for thread priority

use crate::backend::{BackendStatus, RawMutex, RawSemaphore, WaitLimit};
use crate::error::{Error, Result};
use crate::thread::{SpawnSpec, ThreadPriority};
use parking_lot::{Condvar, Mutex};
use std::sync::OnceLock;
use std::time::{Duration, Instant};
use tracing::trace;

/// Mutex type this backend contributes to the common layer.
pub type PlatformMutex = PosixMutex;
/// Semaphore type this backend contributes to the common layer.
pub type PlatformSemaphore = PosixSemaphore;

/// Process-wide monotonic anchor, latched once.
static CLOCK_ANCHOR: OnceLock<Instant> = OnceLock::new();

/// Latches the monotonic anchor if not already latched.
pub fn clock_init() {
    let _ = CLOCK_ANCHOR.get_or_init(Instant::now);
}

/// Nanoseconds elapsed since the anchor. Latches lazily on first use.
#[must_use]
pub fn now_ns() -> u64 {
    let anchor = CLOCK_ANCHOR.get_or_init(Instant::now);
    u64::try_from(anchor.elapsed().as_nanos()).unwrap_or(u64::MAX)
}

/// Suspends the calling thread for `duration`.
pub fn sleep(duration: Duration) {
    std::thread::sleep(duration);
}

/// Yields the calling thread to the OS scheduler.
pub fn yield_now() {
    std::thread::yield_now();
}

/// Identity of the calling thread, unique among live threads.
///
/// A hash of the OS thread identity; stable for the thread's lifetime.
#[must_use]
pub fn current_id() -> u64 {
    use std::hash::{Hash, Hasher};
    // DefaultHasher::new() uses fixed keys, so the value is stable across
    // calls from the same thread.
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    std::thread::current().id().hash(&mut hasher);
    hasher.finish()
}

fn wait_deadline(limit: WaitLimit) -> Option<Instant> {
    match limit {
        WaitLimit::Infinite => None,
        // A window too large for Instant arithmetic is an infinite wait.
        WaitLimit::Ms(ms) => Instant::now().checked_add(Duration::from_millis(ms)),
    }
}

/// Non-reentrant mutex built on a held-flag guarded by a condvar.
#[derive(Debug)]
pub struct PosixMutex {
    state: Mutex<bool>,
    available: Condvar,
}

impl RawMutex for PosixMutex {
    fn new() -> Self {
        Self {
            state: Mutex::new(false),
            available: Condvar::new(),
        }
    }

    fn acquire(&self, limit: WaitLimit) -> BackendStatus {
        let deadline = wait_deadline(limit);
        let mut held = self.state.lock();
        while *held {
            match deadline {
                None => {
                    self.available.wait(&mut held);
                }
                Some(deadline) => {
                    if self.available.wait_until(&mut held, deadline).timed_out() && *held {
                        return BackendStatus::TimedOut;
                    }
                }
            }
        }
        *held = true;
        BackendStatus::Ok
    }

    fn try_acquire(&self) -> BackendStatus {
        let mut held = self.state.lock();
        if *held {
            return BackendStatus::WouldBlock;
        }
        *held = true;
        BackendStatus::Ok
    }

    fn release(&self) -> BackendStatus {
        let mut held = self.state.lock();
        if !*held {
            return BackendStatus::OsFault;
        }
        *held = false;
        drop(held);
        self.available.notify_one();
        BackendStatus::Ok
    }
}

impl Drop for PosixMutex {
    fn drop(&mut self) {
        debug_assert!(!*self.state.get_mut(), "mutex dropped while held");
    }
}

/// Unbounded counting semaphore built on a count guarded by a condvar.
#[derive(Debug)]
pub struct PosixSemaphore {
    count: Mutex<u64>,
    signaled: Condvar,
}

impl RawSemaphore for PosixSemaphore {
    fn new(initial: u64) -> Self {
        Self {
            count: Mutex::new(initial),
            signaled: Condvar::new(),
        }
    }

    fn take(&self, limit: WaitLimit) -> BackendStatus {
        let deadline = wait_deadline(limit);
        let mut count = self.count.lock();
        while *count == 0 {
            match deadline {
                None => {
                    self.signaled.wait(&mut count);
                }
                Some(deadline) => {
                    if self.signaled.wait_until(&mut count, deadline).timed_out() && *count == 0 {
                        return BackendStatus::TimedOut;
                    }
                }
            }
        }
        *count -= 1;
        BackendStatus::Ok
    }

    fn try_take(&self) -> BackendStatus {
        let mut count = self.count.lock();
        if *count == 0 {
            return BackendStatus::WouldBlock;
        }
        *count -= 1;
        BackendStatus::Ok
    }

    fn give(&self) -> BackendStatus {
        let mut count = self.count.lock();
        *count = count.saturating_add(1);
        drop(count);
        self.signaled.notify_one();
        BackendStatus::Ok
    }
}

/// Handle to a spawned OS thread.
#[derive(Debug)]
pub struct RawThread {
    handle: std::thread::JoinHandle<()>,
}

impl RawThread {
    /// Blocks until the thread's entry function returns.
    pub fn join(self) -> BackendStatus {
        match self.handle.join() {
            Ok(()) => BackendStatus::Ok,
            // The entry function panicked; surface as a platform fault.
            Err(_) => BackendStatus::OsFault,
        }
    }
}

/// Launches a native thread running `entry` exactly once.
pub fn spawn(spec: SpawnSpec, entry: Box<dyn FnOnce() + Send + 'static>) -> Result<RawThread> {
    let priority = spec.priority;
    trace!(
        name = %spec.name,
        stack_size = spec.stack_size,
        priority = ?priority,
        "spawning thread"
    );

    let handle = std::thread::Builder::new()
        .name(spec.name)
        .stack_size(spec.stack_size)
        .spawn(move || {
            apply_current_thread_priority(priority);
            entry();
        })
        .map_err(|_| Error::OsError)?;

    Ok(RawThread { handle })
}

/// Maps an OSAL priority class onto the `SCHED_RR` range and applies it to
/// the calling thread. Best-effort: failures are logged and ignored.
#[cfg(unix)]
fn apply_current_thread_priority(priority: ThreadPriority) {
    unsafe {
        let min = libc::sched_get_priority_min(libc::SCHED_RR);
        let max = libc::sched_get_priority_max(libc::SCHED_RR);
        if min < 0 || max < min {
            return;
        }

        let step = (max - min) / 4;
        let native = match priority {
            ThreadPriority::Highest => max,
            other => min + step * i32::from(other.level()),
        };

        let mut param: libc::sched_param = std::mem::zeroed();
        param.sched_priority = native;
        let rc = libc::pthread_setschedparam(libc::pthread_self(), libc::SCHED_RR, &param);
        if rc != 0 {
            tracing::debug!(native, rc, "could not apply thread priority");
        }
    }
}

#[cfg(not(unix))]
fn apply_current_thread_priority(_priority: ThreadPriority) {}
