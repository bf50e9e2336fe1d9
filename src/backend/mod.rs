//! Platform backend contract and build-time backend selection.
//!
//! The common primitives (`Mutex`, `Semaphore`, `Thread`) depend only on the
//! contract defined here: raw create/acquire/release operations returning a
//! small discriminated [`BackendStatus`], blocking waits bounded by a
//! [`WaitLimit`] (milliseconds or infinite), and a monotonic clock source.
//! One implementation module exists per backend and the active one is chosen
//! by a cargo feature, so backend internals never leak into the core.
//!
//! The `rtos` module also compiles under `cfg(test)` so its tick semantics
//! stay unit-testable from the default (`posix`) build.

use crate::error::{Error, Result};

#[cfg(feature = "posix")]
pub mod posix;

#[cfg(any(test, feature = "rtos"))]
pub mod rtos;

/// The backend selected at build time.
#[cfg(all(feature = "posix", not(feature = "rtos")))]
pub use self::posix as active;

/// The backend selected at build time.
#[cfg(feature = "rtos")]
pub use self::rtos as active;

#[cfg(not(any(feature = "posix", feature = "rtos")))]
compile_error!("an OSAL backend feature must be enabled: `posix` or `rtos`");

/// Maximum time a blocking backend call may wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitLimit {
    /// Block until the operation completes.
    Infinite,
    /// Block for at most this many milliseconds.
    Ms(u64),
}

/// Discriminated result of a raw backend operation.
///
/// The core translates these into the unified [`Error`] taxonomy at the
/// backend boundary; backends never construct `Error` values themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum BackendStatus {
    /// The operation completed.
    Ok,
    /// A non-blocking acquire found the resource busy.
    WouldBlock,
    /// The wait limit elapsed before the operation completed.
    TimedOut,
    /// The platform reported a fault it should not be able to report.
    OsFault,
    /// The handle or argument was not valid for this operation.
    InvalidArgument,
}

impl BackendStatus {
    /// Translates the backend status into the unified error taxonomy.
    pub fn into_result(self) -> Result<()> {
        match self {
            Self::Ok => Ok(()),
            Self::WouldBlock => Err(Error::Locked),
            Self::TimedOut => Err(Error::Timeout),
            Self::OsFault => {
                debug_assert!(false, "backend reported an unexpected fault");
                Err(Error::OsError)
            }
            Self::InvalidArgument => Err(Error::InvalidArgument),
        }
    }
}

/// Raw mutual-exclusion primitive provided by a backend.
///
/// Always non-reentrant: recursion and ownership bookkeeping live in the
/// common layer, never in the backend.
pub trait RawMutex: Send + Sync + sealed::Sealed {
    /// Creates the primitive in the unlocked state.
    fn new() -> Self;

    /// Acquires the mutex, blocking up to `limit`.
    fn acquire(&self, limit: WaitLimit) -> BackendStatus;

    /// Acquires the mutex without blocking.
    fn try_acquire(&self) -> BackendStatus;

    /// Releases the mutex. Reports [`BackendStatus::OsFault`] when the mutex
    /// is not held, where the backend can detect that cheaply.
    fn release(&self) -> BackendStatus;
}

/// Raw counting semaphore provided by a backend. The count has no ceiling.
pub trait RawSemaphore: Send + Sync + sealed::Sealed {
    /// Creates the primitive with the given initial count.
    fn new(initial: u64) -> Self;

    /// Decrements the count, blocking up to `limit` while it is zero.
    fn take(&self, limit: WaitLimit) -> BackendStatus;

    /// Decrements the count without blocking.
    fn try_take(&self) -> BackendStatus;

    /// Increments the count and wakes one waiter. Never blocks.
    fn give(&self) -> BackendStatus;
}

mod sealed {
    pub trait Sealed {}

    #[cfg(feature = "posix")]
    impl Sealed for super::posix::PosixMutex {}
    #[cfg(feature = "posix")]
    impl Sealed for super::posix::PosixSemaphore {}

    #[cfg(any(test, feature = "rtos"))]
    impl Sealed for super::rtos::TickMutex {}
    #[cfg(any(test, feature = "rtos"))]
    impl Sealed for super::rtos::TickSemaphore {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_translation_matches_taxonomy() {
        assert!(BackendStatus::Ok.into_result().is_ok());
        assert_eq!(
            BackendStatus::WouldBlock.into_result(),
            Err(Error::Locked)
        );
        assert_eq!(BackendStatus::TimedOut.into_result(), Err(Error::Timeout));
        assert_eq!(
            BackendStatus::InvalidArgument.into_result(),
            Err(Error::InvalidArgument)
        );
    }
}
