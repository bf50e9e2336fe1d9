//! Deadline tracking for blocking operations.
//!
//! A [`Timeout`] captures an absolute deadline once, at construction, and is
//! then passed by value through arbitrarily deep call chains. Every nested
//! blocking call consults the same deadline, so cumulative nested delays stay
//! bounded by the original timeout instead of restarting at each level.
//!
//! Copies share the deadline: cloning a `Timeout` never recomputes it.

use crate::backend::WaitLimit;
use crate::timestamp::Timestamp;
use std::time::Duration;

/// An immutable-after-construction deadline computed from a duration.
///
/// Supports two special forms: [`Timeout::infinity`] never expires, and
/// [`Timeout::none`] is expired from the moment it is created (zero duration,
/// not infinite).
#[derive(Debug, Clone, Copy)]
pub struct Timeout {
    duration: Duration,
    infinite: bool,
    deadline: Timestamp,
}

impl Timeout {
    /// Creates a timeout that expires `duration` from now.
    ///
    /// `Duration::MAX` is treated as infinite; no deadline is computed.
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self::with_expiry(duration, false)
    }

    /// Creates a timeout that carries `duration` but is already expired.
    ///
    /// Useful for turning a blocking call into a non-blocking probe while
    /// preserving the duration for a later [`reset`](Self::reset).
    #[must_use]
    pub fn expired(duration: Duration) -> Self {
        Self::with_expiry(duration, true)
    }

    /// Zero-duration timeout: immediately expired, not infinite.
    #[must_use]
    pub fn none() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Timeout that never expires.
    #[must_use]
    pub fn infinity() -> Self {
        Self::new(Duration::MAX)
    }

    fn with_expiry(duration: Duration, force_expire: bool) -> Self {
        let infinite = duration == Duration::MAX;
        let deadline = if infinite {
            Timestamp::default()
        } else {
            let window = if force_expire { Duration::ZERO } else { duration };
            Timestamp::now().saturating_add(window)
        };
        Self {
            duration,
            infinite,
            deadline,
        }
    }

    /// The duration this timeout was constructed from.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    /// Whether this timeout represents an infinite wait.
    #[must_use]
    pub const fn is_infinite(&self) -> bool {
        self.infinite
    }

    /// Whether the deadline has been reached.
    ///
    /// Always false for infinite timeouts. Once true, stays true until
    /// [`reset`](Self::reset).
    #[must_use]
    pub fn is_expired(&self) -> bool {
        !self.infinite && self.time_left().is_zero()
    }

    /// Time remaining until the deadline, clamped at zero once passed.
    ///
    /// Infinite timeouts report `Duration::MAX`.
    #[must_use]
    pub fn time_left(&self) -> Duration {
        if self.infinite {
            return Duration::MAX;
        }
        self.deadline.saturating_duration_since(Timestamp::now())
    }

    /// Recomputes the deadline as if the timeout was constructed now, from
    /// the original duration. Infinite timeouts are unaffected.
    pub fn reset(&mut self) {
        *self = Self::new(self.duration);
    }

    /// Converts the remaining time into the backend's wait value.
    ///
    /// The conversion reads `time_left()`, not the original duration, so a
    /// partially elapsed timeout yields a proportionally shorter wait.
    #[must_use]
    pub fn as_wait_limit(&self) -> WaitLimit {
        if self.infinite {
            WaitLimit::Infinite
        } else {
            WaitLimit::Ms(u64::try_from(self.time_left().as_millis()).unwrap_or(u64::MAX))
        }
    }
}

impl From<Duration> for Timeout {
    fn from(duration: Duration) -> Self {
        Self::new(duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sleep::sleep;

    #[test]
    fn carries_the_construction_duration() {
        let t = Timeout::new(Duration::from_millis(100));
        assert_eq!(t.duration(), Duration::from_millis(100));
        assert!(!t.is_infinite());
    }

    #[test]
    fn time_left_never_exceeds_duration() {
        let t = Timeout::new(Duration::from_secs(3));
        assert!(t.time_left() <= Duration::from_secs(3));
        assert!(!t.is_expired());
    }

    #[test]
    fn none_is_expired_immediately() {
        let t = Timeout::none();
        assert!(t.is_expired());
        assert!(!t.is_infinite());
        assert_eq!(t.time_left(), Duration::ZERO);
        assert_eq!(t.duration(), Duration::ZERO);
    }

    #[test]
    fn infinity_never_expires() {
        let t = Timeout::infinity();
        assert!(t.is_infinite());
        assert!(!t.is_expired());
        assert_eq!(t.time_left(), Duration::MAX);
        assert_eq!(t.as_wait_limit(), WaitLimit::Infinite);
    }

    #[test]
    fn force_expired_keeps_duration_for_reset() {
        let mut t = Timeout::expired(Duration::from_secs(60));
        assert!(t.is_expired());
        assert_eq!(t.duration(), Duration::from_secs(60));

        t.reset();
        assert!(!t.is_expired());
        assert!(t.time_left() <= Duration::from_secs(60));
    }

    #[test]
    fn expires_after_elapsed_time_and_stays_expired() {
        let t = Timeout::new(Duration::from_millis(20));
        assert!(!t.is_expired());
        sleep(Duration::from_millis(40));
        assert!(t.is_expired());
        assert!(t.is_expired());
        assert_eq!(t.time_left(), Duration::ZERO);
    }

    #[test]
    fn copies_share_the_deadline() {
        let t = Timeout::new(Duration::from_millis(30));
        sleep(Duration::from_millis(10));
        let copy = t;
        // A recomputed deadline would give the copy the full 30 ms again.
        assert!(copy.time_left() <= Duration::from_millis(21));
    }

    #[test]
    fn reset_restarts_the_countdown() {
        let mut t = Timeout::new(Duration::from_millis(15));
        sleep(Duration::from_millis(30));
        assert!(t.is_expired());

        t.reset();
        assert!(!t.is_expired());
        assert_eq!(t.duration(), Duration::from_millis(15));
    }

    #[test]
    fn wait_limit_reflects_remaining_time() {
        let t = Timeout::new(Duration::from_millis(500));
        match t.as_wait_limit() {
            WaitLimit::Ms(ms) => assert!(ms <= 500),
            WaitLimit::Infinite => unreachable!("finite timeout"),
        }

        let expired = Timeout::none();
        assert_eq!(expired.as_wait_limit(), WaitLimit::Ms(0));
    }
}
