//! RAII wrapper pairing a lock with its unlock.

use crate::mutex::Mutex;
use crate::timeout::Timeout;
use tracing::trace;

/// Holds a [`Mutex`] locked for the lifetime of the guard.
///
/// Construction attempts the lock; [`is_acquired`](Self::is_acquired)
/// reports whether it succeeded. Dropping the guard unlocks only when the
/// lock was actually taken, so a failed acquisition is safe to let fall out
/// of scope. Borrows the mutex, tying the guard to one stack frame.
#[derive(Debug)]
#[must_use = "the lock is released when the guard is dropped"]
pub struct ScopedLock<'a> {
    mutex: &'a Mutex,
    acquired: bool,
}

impl<'a> ScopedLock<'a> {
    /// Locks `mutex`, blocking until it is available.
    ///
    /// A lock rejected by the mutex (recursive re-entry on a non-recursive
    /// mutex) yields a guard that reports not acquired.
    pub fn new(mutex: &'a Mutex) -> Self {
        let acquired = mutex.lock().is_ok();
        Self { mutex, acquired }
    }

    /// Locks `mutex`, giving up when `timeout` expires.
    pub fn with_timeout(mutex: &'a Mutex, timeout: Timeout) -> Self {
        let acquired = mutex.timed_lock(timeout).is_ok();
        Self { mutex, acquired }
    }

    /// Whether the construction actually took the lock.
    #[must_use]
    pub const fn is_acquired(&self) -> bool {
        self.acquired
    }
}

impl Drop for ScopedLock<'_> {
    fn drop(&mut self) {
        if self.acquired {
            if let Err(error) = self.mutex.unlock() {
                trace!(%error, "scoped unlock failed");
            }
        }
    }
}
