//! Monotonic timestamps and time-unit conversions.
//!
//! All timestamps are expressed relative to a process-wide monotonic anchor
//! latched by [`init`]. The anchor never tracks wall-clock time, so values
//! are immune to clock adjustments. On the POSIX backend the anchor is a
//! steady-clock instant; on the RTOS backend it is the kernel tick counter.
//!
//! The unit conversion helpers are pure integer arithmetic: divisions
//! truncate and the scaling multiplications may overflow silently. Guarding
//! against overflow is the caller's responsibility.

use crate::backend::active;
use std::time::Duration;

/// Latches the process-wide monotonic anchor.
///
/// Idempotent; the first timestamp query latches the anchor lazily if this
/// was never called, so explicit initialization is only required when the
/// application wants a well-defined epoch (e.g. before spawning threads).
pub fn init() {
    active::clock_init();
}

/// Releases process-wide clock state.
///
/// Present for lifecycle symmetry with [`init`]; the monotonic anchor itself
/// is retained so timestamps taken after shutdown remain monotonic.
pub fn shutdown() {}

/// Returns the elapsed time since [`init`] in milliseconds.
#[must_use]
pub fn timestamp_ms() -> u64 {
    convert::ns_to_ms(active::now_ns())
}

/// Returns the elapsed time since [`init`] in microseconds.
#[must_use]
pub fn timestamp_us() -> u64 {
    convert::ns_to_us(active::now_ns())
}

/// Returns the elapsed time since [`init`] in nanoseconds.
#[must_use]
pub fn timestamp_ns() -> u64 {
    active::now_ns()
}

/// A point in the process-relative monotonic time domain.
///
/// Nanosecond resolution, anchored at the [`init`] epoch. Values are
/// non-decreasing across calls within a process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Returns the current timestamp.
    #[must_use]
    pub fn now() -> Self {
        Self(active::now_ns())
    }

    /// Constructs a timestamp from raw nanoseconds since the epoch.
    #[must_use]
    pub const fn from_ns(ns: u64) -> Self {
        Self(ns)
    }

    /// Elapsed nanoseconds since the epoch.
    #[must_use]
    pub const fn as_ns(&self) -> u64 {
        self.0
    }

    /// Elapsed microseconds since the epoch (truncating).
    #[must_use]
    pub const fn as_us(&self) -> u64 {
        convert::ns_to_us(self.0)
    }

    /// Elapsed milliseconds since the epoch (truncating).
    #[must_use]
    pub const fn as_ms(&self) -> u64 {
        convert::ns_to_ms(self.0)
    }

    /// Elapsed whole seconds since the epoch (truncating).
    #[must_use]
    pub const fn as_secs(&self) -> u64 {
        convert::ns_to_sec(self.0)
    }

    /// Returns this timestamp advanced by `duration`, saturating at the
    /// maximum representable instant.
    #[must_use]
    pub fn saturating_add(&self, duration: Duration) -> Self {
        let ns = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        Self(self.0.saturating_add(ns))
    }

    /// Time elapsed from `earlier` to `self`, or zero if `earlier` is later.
    #[must_use]
    pub fn saturating_duration_since(&self, earlier: Self) -> Duration {
        Duration::from_nanos(self.0.saturating_sub(earlier.0))
    }
}

/// Truncating and scaling conversions between time units.
///
/// Divisions truncate toward zero; multiplications wrap silently on overflow.
pub mod convert {
    const MS_IN_SEC: u64 = 1_000;
    const US_IN_SEC: u64 = 1_000_000;
    const NS_IN_SEC: u64 = 1_000_000_000;
    const US_IN_MS: u64 = 1_000;
    const NS_IN_MS: u64 = 1_000_000;
    const NS_IN_US: u64 = 1_000;

    /// Milliseconds to whole seconds.
    #[must_use]
    pub const fn ms_to_sec(ms: u64) -> u64 {
        ms / MS_IN_SEC
    }

    /// Microseconds to whole seconds.
    #[must_use]
    pub const fn us_to_sec(us: u64) -> u64 {
        us / US_IN_SEC
    }

    /// Nanoseconds to whole seconds.
    #[must_use]
    pub const fn ns_to_sec(ns: u64) -> u64 {
        ns / NS_IN_SEC
    }

    /// Seconds to milliseconds.
    #[must_use]
    pub const fn sec_to_ms(sec: u64) -> u64 {
        sec.wrapping_mul(MS_IN_SEC)
    }

    /// Microseconds to whole milliseconds.
    #[must_use]
    pub const fn us_to_ms(us: u64) -> u64 {
        us / US_IN_MS
    }

    /// Nanoseconds to whole milliseconds.
    #[must_use]
    pub const fn ns_to_ms(ns: u64) -> u64 {
        ns / NS_IN_MS
    }

    /// Seconds to microseconds.
    #[must_use]
    pub const fn sec_to_us(sec: u64) -> u64 {
        sec.wrapping_mul(US_IN_SEC)
    }

    /// Milliseconds to microseconds.
    #[must_use]
    pub const fn ms_to_us(ms: u64) -> u64 {
        ms.wrapping_mul(US_IN_MS)
    }

    /// Nanoseconds to whole microseconds.
    #[must_use]
    pub const fn ns_to_us(ns: u64) -> u64 {
        ns / NS_IN_US
    }

    /// Seconds to nanoseconds.
    #[must_use]
    pub const fn sec_to_ns(sec: u64) -> u64 {
        sec.wrapping_mul(NS_IN_SEC)
    }

    /// Milliseconds to nanoseconds.
    #[must_use]
    pub const fn ms_to_ns(ms: u64) -> u64 {
        ms.wrapping_mul(NS_IN_MS)
    }

    /// Microseconds to nanoseconds.
    #[must_use]
    pub const fn us_to_ns(us: u64) -> u64 {
        us.wrapping_mul(NS_IN_US)
    }
}
