//! Suspending the calling thread.

use crate::backend::active;
use crate::timeout::Timeout;
use std::time::Duration;

/// Suspends the calling thread for at least `duration`.
///
/// On the tick backend the suspension is quantized to whole ticks.
pub fn sleep(duration: Duration) {
    active::sleep(duration);
}

/// Suspends the calling thread until `timeout` expires.
///
/// Already-expired timeouts return immediately. An infinite timeout would
/// suspend forever and is rejected: debug builds assert, release builds
/// return without sleeping.
pub fn sleep_until_expired(timeout: &Timeout) {
    debug_assert!(
        !timeout.is_infinite(),
        "sleeping until an infinite timeout expires"
    );
    if timeout.is_infinite() {
        return;
    }
    let remaining = timeout.time_left();
    if !remaining.is_zero() {
        active::sleep(remaining);
    }
}
