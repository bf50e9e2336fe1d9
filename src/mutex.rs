//! Mutual exclusion with explicit lock and unlock.
//!
//! Unlike `std::sync::Mutex`, a [`Mutex`] does not hand out a guard: lock and
//! unlock are separate calls that may happen in different scopes, which is
//! what a C-style locking discipline and the [`ScopedLock`] RAII wrapper are
//! built on. The price is that ownership must be checked at runtime: every
//! unlock verifies the calling thread actually holds the lock.
//!
//! Recursion is implemented entirely in this layer. The backend primitive is
//! always non-reentrant; owner identity and depth live in a small
//! bookkeeping record guarded by its own `parking_lot::Mutex`, distinct from
//! the primitive being modeled. The `_isr` entry points bypass that record
//! entirely and touch only the backend primitive, which keeps them to a
//! single atomic operation on the tick backend.
//!
//! [`ScopedLock`]: crate::scoped_lock::ScopedLock

use crate::backend::active;
use crate::backend::{BackendStatus, RawMutex, WaitLimit};
use crate::error::{Error, Result};
use crate::thread;
use crate::timeout::Timeout;

/// Locking discipline of a [`Mutex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MutexType {
    /// Re-entry by the owning thread is a usage error.
    #[default]
    NonRecursive,
    /// The owning thread may lock again; unlocks must balance locks.
    Recursive,
}

#[derive(Debug, Default)]
struct Bookkeeping {
    owner: Option<u64>,
    depth: u32,
}

/// A mutex with runtime ownership tracking and optional recursion.
///
/// Move-only, never copied. Both backends expose identical behavior,
/// including every error path.
#[derive(Debug)]
pub struct Mutex {
    raw: active::PlatformMutex,
    kind: MutexType,
    book: parking_lot::Mutex<Bookkeeping>,
}

impl Mutex {
    /// Creates an unlocked, non-recursive mutex.
    #[must_use]
    pub fn new() -> Self {
        Self::with_type(MutexType::NonRecursive)
    }

    /// Creates an unlocked mutex with the given discipline.
    #[must_use]
    pub fn with_type(kind: MutexType) -> Self {
        Self {
            raw: active::PlatformMutex::new(),
            kind,
            book: parking_lot::Mutex::new(Bookkeeping::default()),
        }
    }

    /// The locking discipline this mutex was created with.
    #[must_use]
    pub const fn mutex_type(&self) -> MutexType {
        self.kind
    }

    /// Locks the mutex, blocking until it is available.
    ///
    /// # Errors
    ///
    /// [`Error::RecursiveUsage`] when the owning thread re-enters a
    /// non-recursive mutex.
    pub fn lock(&self) -> Result<()> {
        self.lock_with(WaitLimit::Infinite)
    }

    /// Locks the mutex without blocking.
    ///
    /// # Errors
    ///
    /// [`Error::Locked`] when another thread holds the lock;
    /// [`Error::RecursiveUsage`] on non-recursive re-entry.
    pub fn try_lock(&self) -> Result<()> {
        let me = thread::current_id();
        if self.reenter(me)? {
            return Ok(());
        }
        self.raw.try_acquire().into_result()?;
        self.record_owner(me);
        Ok(())
    }

    /// Locks the mutex, blocking until the timeout expires.
    ///
    /// An already-expired timeout degenerates to a non-blocking attempt.
    ///
    /// # Errors
    ///
    /// [`Error::Timeout`] when the deadline passes first;
    /// [`Error::RecursiveUsage`] on non-recursive re-entry.
    pub fn timed_lock(&self, timeout: Timeout) -> Result<()> {
        self.lock_with(timeout.as_wait_limit())
    }

    /// Unlocks the mutex.
    ///
    /// On a recursive mutex, each unlock balances one lock; the backend is
    /// released only when the outermost lock is undone.
    ///
    /// # Errors
    ///
    /// [`Error::NotLocked`] when the mutex is not locked at all;
    /// [`Error::NotOwner`] when a different thread holds it.
    pub fn unlock(&self) -> Result<()> {
        let mut book = self.book.lock();
        if book.depth == 0 {
            return Err(Error::NotLocked);
        }
        if book.owner != Some(thread::current_id()) {
            return Err(Error::NotOwner);
        }
        book.depth -= 1;
        if book.depth == 0 {
            book.owner = None;
            drop(book);
            return self.raw.release().into_result();
        }
        Ok(())
    }

    /// Locks the mutex from interrupt context. Never blocks.
    ///
    /// Operates on the backend primitive alone — the thread-side bookkeeping
    /// lock is never taken, so on the tick backend this is a single atomic
    /// operation. An acquisition taken here must be released with
    /// [`unlock_isr`](Self::unlock_isr), not [`unlock`](Self::unlock).
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] on a recursive mutex (no owner identity in
    /// an ISR); [`Error::Locked`] when held.
    pub fn try_lock_isr(&self) -> Result<()> {
        if self.kind == MutexType::Recursive {
            return Err(Error::InvalidArgument);
        }
        self.raw.try_acquire().into_result()
    }

    /// Unlocks the mutex from interrupt context. Never blocks.
    ///
    /// The owner check is skipped: interrupt context has no thread identity,
    /// and the bookkeeping lock is never taken. Only acquisitions made with
    /// [`try_lock_isr`](Self::try_lock_isr) may be released here; releasing
    /// a thread-side lock from an ISR leaves its bookkeeping stale.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] on a recursive mutex;
    /// [`Error::NotLocked`] when the mutex is not locked.
    pub fn unlock_isr(&self) -> Result<()> {
        if self.kind == MutexType::Recursive {
            return Err(Error::InvalidArgument);
        }
        match self.raw.release() {
            // The backend tracks held state itself; releasing an unheld
            // mutex is the not-locked case, not a platform fault.
            BackendStatus::OsFault => Err(Error::NotLocked),
            status => status.into_result(),
        }
    }

    fn lock_with(&self, limit: WaitLimit) -> Result<()> {
        let me = thread::current_id();
        if self.reenter(me)? {
            return Ok(());
        }
        match self.raw.acquire(limit) {
            BackendStatus::Ok => {
                self.record_owner(me);
                Ok(())
            }
            status => status.into_result(),
        }
    }

    /// Handles re-entry by the current owner. Returns `Ok(true)` when the
    /// lock was taken recursively without touching the backend.
    fn reenter(&self, me: u64) -> Result<bool> {
        let mut book = self.book.lock();
        if book.owner != Some(me) {
            return Ok(false);
        }
        match self.kind {
            MutexType::Recursive => {
                book.depth += 1;
                Ok(true)
            }
            MutexType::NonRecursive => Err(Error::RecursiveUsage),
        }
    }

    fn record_owner(&self, me: u64) {
        let mut book = self.book.lock();
        book.owner = Some(me);
        book.depth = 1;
    }
}

impl Default for Mutex {
    fn default() -> Self {
        Self::new()
    }
}
