//! Counting semaphore.
//!
//! The count is unbounded: signaling above the initial value is allowed and
//! simply raises the count. Waiter wake order is whatever the backend's
//! condvar or scheduler provides; FIFO is not guaranteed.

use crate::backend::active;
use crate::backend::{RawSemaphore, WaitLimit};
use crate::error::Result;
use crate::timeout::Timeout;

/// A counting semaphore with blocking, timed, and ISR-safe operations.
///
/// Move-only, never copied. Both backends expose identical behavior.
#[derive(Debug)]
pub struct Semaphore {
    raw: active::PlatformSemaphore,
}

impl Semaphore {
    /// Creates a semaphore with the given initial count.
    #[must_use]
    pub fn new(initial_value: u64) -> Self {
        Self {
            raw: active::PlatformSemaphore::new(initial_value),
        }
    }

    /// Decrements the count, blocking while it is zero.
    pub fn wait(&self) -> Result<()> {
        self.raw.take(WaitLimit::Infinite).into_result()
    }

    /// Decrements the count without blocking.
    ///
    /// # Errors
    ///
    /// [`Error::Locked`](crate::Error::Locked) when the count is zero.
    pub fn try_wait(&self) -> Result<()> {
        self.raw.try_take().into_result()
    }

    /// Decrements the count from interrupt context. Never blocks.
    ///
    /// # Errors
    ///
    /// [`Error::Locked`](crate::Error::Locked) when the count is zero.
    pub fn try_wait_isr(&self) -> Result<()> {
        self.raw.try_take().into_result()
    }

    /// Decrements the count, blocking until the timeout expires.
    ///
    /// An already-expired timeout degenerates to a non-blocking attempt.
    ///
    /// # Errors
    ///
    /// [`Error::Timeout`](crate::Error::Timeout) when the deadline passes
    /// while the count is still zero.
    pub fn timed_wait(&self, timeout: Timeout) -> Result<()> {
        self.raw.take(timeout.as_wait_limit()).into_result()
    }

    /// Increments the count and wakes one waiter.
    ///
    /// There is no ceiling; signaling above the initial value is valid.
    pub fn signal(&self) -> Result<()> {
        self.raw.give().into_result()
    }

    /// Increments the count from interrupt context. Never blocks.
    pub fn signal_isr(&self) -> Result<()> {
        self.raw.give().into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::{test_complete, test_phase};
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    #[test]
    fn counts_down_from_the_initial_value() {
        let sem = Semaphore::new(2);
        sem.wait().unwrap();
        sem.try_wait().unwrap();
        assert_eq!(sem.try_wait(), Err(Error::Locked));
    }

    #[test]
    fn signal_above_the_initial_value_has_no_ceiling() {
        let sem = Semaphore::new(1);
        for _ in 0..5 {
            sem.signal().unwrap();
        }
        for _ in 0..6 {
            sem.try_wait().unwrap();
        }
        assert_eq!(sem.try_wait(), Err(Error::Locked));
    }

    #[test]
    fn timed_wait_expires_while_empty() {
        let sem = Semaphore::new(0);
        let start = Instant::now();
        let result = sem.timed_wait(Timeout::new(Duration::from_millis(40)));
        assert_eq!(result, Err(Error::Timeout));
        assert!(start.elapsed() >= Duration::from_millis(40));
    }

    #[test]
    fn expired_timeout_degenerates_to_try_wait() {
        let sem = Semaphore::new(1);
        sem.timed_wait(Timeout::none()).unwrap();
        // Empty now; the expired window reports Timeout without blocking.
        let start = Instant::now();
        assert_eq!(sem.timed_wait(Timeout::none()), Err(Error::Timeout));
        assert!(start.elapsed() < Duration::from_millis(20));
    }

    #[test]
    fn wait_unblocks_on_signal_from_another_thread() {
        crate::test_utils::init_test_logging();
        test_phase!("wait_unblocks_on_signal_from_another_thread");

        let sem = Arc::new(Semaphore::new(0));
        let signaler = sem.clone();

        let waiter = std::thread::spawn(move || sem.wait());
        std::thread::sleep(Duration::from_millis(20));
        signaler.signal().unwrap();
        waiter.join().unwrap().unwrap();
        test_complete!("wait_unblocks_on_signal_from_another_thread");
    }

    #[test]
    fn isr_variants_mirror_the_thread_variants() {
        let sem = Semaphore::new(0);
        assert_eq!(sem.try_wait_isr(), Err(Error::Locked));
        sem.signal_isr().unwrap();
        sem.try_wait_isr().unwrap();
    }
}
