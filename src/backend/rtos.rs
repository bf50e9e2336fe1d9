//! Tick-based backend emulating a FreeRTOS-class kernel.
//!
//! Time is a millisecond-resolution tick counter, not a host clock. Blocking
//! waits are quantized to ticks: a wait limit in milliseconds is converted by
//! truncating division, re-checked once per tick, and gives up when its tick
//! budget is exhausted. ISR-safe paths touch only atomics and can never
//! block, yield, or allocate.
//!
//! The counter is advanced with [`advance_ticks`]; wiring it to a hardware
//! timer or a host thread is the embedder's job, not this module's.

use crate::backend::{BackendStatus, RawMutex, RawSemaphore, WaitLimit};
use crate::error::{Error, Result};
use crate::thread::{SpawnSpec, ThreadPriority};
use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Duration;
use tracing::trace;

/// Mutex type this backend contributes to the common layer.
pub type PlatformMutex = TickMutex;
/// Semaphore type this backend contributes to the common layer.
pub type PlatformSemaphore = TickSemaphore;

/// Number of distinct native priority levels, analogous to a kernel's
/// `configMAX_PRIORITIES`.
pub const MAX_PRIORITIES: u32 = 32;

/// Kernel tick rate. One tick per millisecond.
pub const TICK_RATE_HZ: u64 = 1_000;

const NS_PER_TICK: u64 = 1_000_000_000 / TICK_RATE_HZ;
const MS_PER_TICK: u64 = 1_000 / TICK_RATE_HZ;

/// Global tick counter plus a condvar waking tick-quantized waiters.
struct TickClock {
    ticks: Mutex<u64>,
    advanced: Condvar,
}

static CLOCK: TickClock = TickClock {
    ticks: Mutex::new(0),
    advanced: Condvar::new(),
};

/// Tick value latched at initialization; timestamps are relative to it.
static CLOCK_ANCHOR: OnceLock<u64> = OnceLock::new();

/// Latches the tick anchor if not already latched.
pub fn clock_init() {
    let _ = CLOCK_ANCHOR.get_or_init(tick_count);
}

/// Nanoseconds elapsed since the anchor, derived from whole ticks.
#[must_use]
pub fn now_ns() -> u64 {
    let anchor = *CLOCK_ANCHOR.get_or_init(tick_count);
    tick_count().saturating_sub(anchor).saturating_mul(NS_PER_TICK)
}

/// Current raw tick count.
#[must_use]
pub fn tick_count() -> u64 {
    *CLOCK.ticks.lock()
}

/// Advances the tick counter and wakes every tick-quantized waiter.
pub fn advance_ticks(ticks: u64) {
    let mut current = CLOCK.ticks.lock();
    *current = current.saturating_add(ticks);
    drop(current);
    CLOCK.advanced.notify_all();
}

/// Blocks until the tick counter moves past `current`.
fn wait_for_tick(current: u64) -> u64 {
    let mut ticks = CLOCK.ticks.lock();
    while *ticks <= current {
        CLOCK.advanced.wait(&mut ticks);
    }
    *ticks
}

/// Converts a wait limit to a tick budget by truncating division.
fn tick_budget(limit: WaitLimit) -> Option<u64> {
    match limit {
        WaitLimit::Infinite => None,
        WaitLimit::Ms(ms) => Some(ms / MS_PER_TICK.max(1)),
    }
}

/// Retries `try_op` once per tick until it succeeds or the budget runs out.
fn take_within<F>(limit: WaitLimit, try_op: F) -> BackendStatus
where
    F: Fn() -> BackendStatus,
{
    let budget = tick_budget(limit);
    let start = tick_count();
    let mut now = start;
    loop {
        match try_op() {
            BackendStatus::WouldBlock => {}
            status => return status,
        }
        if let Some(budget) = budget {
            if now.saturating_sub(start) >= budget {
                return BackendStatus::TimedOut;
            }
        }
        now = wait_for_tick(now);
    }
}

/// Non-reentrant mutex: a single atomic held flag.
#[derive(Debug)]
pub struct TickMutex {
    held: AtomicBool,
}

impl RawMutex for TickMutex {
    fn new() -> Self {
        Self {
            held: AtomicBool::new(false),
        }
    }

    fn acquire(&self, limit: WaitLimit) -> BackendStatus {
        // A blocking acquire is the timed path with an unbounded budget.
        take_within(limit, || self.try_acquire())
    }

    fn try_acquire(&self) -> BackendStatus {
        if self
            .held
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
        {
            BackendStatus::Ok
        } else {
            BackendStatus::WouldBlock
        }
    }

    fn release(&self) -> BackendStatus {
        if self.held.swap(false, Ordering::Release) {
            BackendStatus::Ok
        } else {
            BackendStatus::OsFault
        }
    }
}

/// Unbounded counting semaphore: a single atomic counter.
#[derive(Debug)]
pub struct TickSemaphore {
    count: AtomicU64,
}

impl RawSemaphore for TickSemaphore {
    fn new(initial: u64) -> Self {
        Self {
            count: AtomicU64::new(initial),
        }
    }

    fn take(&self, limit: WaitLimit) -> BackendStatus {
        take_within(limit, || self.try_take())
    }

    fn try_take(&self) -> BackendStatus {
        let decremented = self
            .count
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |count| {
                count.checked_sub(1)
            });
        if decremented.is_ok() {
            BackendStatus::Ok
        } else {
            BackendStatus::WouldBlock
        }
    }

    fn give(&self) -> BackendStatus {
        self.count.fetch_add(1, Ordering::AcqRel);
        BackendStatus::Ok
    }
}

/// Handle to a task. Execution is carried by a host thread; scheduling
/// semantics (tick quantization, priority levels) come from this module.
#[derive(Debug)]
pub struct RawThread {
    handle: std::thread::JoinHandle<()>,
}

impl RawThread {
    /// Blocks until the task's entry function returns.
    pub fn join(self) -> BackendStatus {
        match self.handle.join() {
            Ok(()) => BackendStatus::Ok,
            Err(_) => BackendStatus::OsFault,
        }
    }
}

/// Launches a task running `entry` exactly once.
pub fn spawn(spec: SpawnSpec, entry: Box<dyn FnOnce() + Send + 'static>) -> Result<RawThread> {
    trace!(
        name = %spec.name,
        stack_size = spec.stack_size,
        native_priority = native_priority(spec.priority),
        "spawning task"
    );

    let handle = std::thread::Builder::new()
        .name(spec.name)
        .stack_size(spec.stack_size)
        .spawn(move || entry())
        .map_err(|_| Error::OsError)?;

    Ok(RawThread { handle })
}

/// Maps an OSAL priority class onto `0..MAX_PRIORITIES` by linear
/// interpolation: lowest is 0, highest is the top level, normal sits at
/// the midpoint.
#[must_use]
pub fn native_priority(priority: ThreadPriority) -> u32 {
    let max = MAX_PRIORITIES - 1;
    let step = max / 4;
    match priority {
        ThreadPriority::Highest => max,
        other => step * u32::from(other.level()),
    }
}

/// Yields the calling task to the scheduler.
pub fn yield_now() {
    std::thread::yield_now();
}

/// Identity of the calling task, unique among live tasks.
#[must_use]
pub fn current_id() -> u64 {
    use std::hash::{Hash, Hasher};
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    std::thread::current().id().hash(&mut hasher);
    hasher.finish()
}

/// Suspends the calling task for a tick-quantized duration.
pub fn sleep(duration: Duration) {
    let target_ticks = u64::try_from(duration.as_millis())
        .unwrap_or(u64::MAX)
        .checked_div(MS_PER_TICK.max(1))
        .unwrap_or(0);
    let start = tick_count();
    let mut now = start;
    while now.saturating_sub(start) < target_ticks {
        now = wait_for_tick(now);
    }
}
