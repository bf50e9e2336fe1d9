//! Error types and error handling strategy for the OSAL.
//!
//! Every primitive operation returns a [`Result`]; expected outcomes such as
//! an expired timeout or an already-held lock are ordinary error values, not
//! panics. Errors are explicit and typed, and are classified by category so
//! callers can distinguish usage bugs from contention from platform faults.
//!
//! # Error Categories
//!
//! - **Usage**: the caller violated a contract that the layer can detect
//!   (bad argument, unlock by a non-owner, double start).
//! - **Contention**: the resource was busy or the deadline passed. These are
//!   normal control-flow outcomes and safe to retry.
//! - **Platform**: the backend reported a fault it should never report. These
//!   are debug-asserted where they occur but still surfaced in release.

use core::fmt;

/// Result type used by all OSAL operations.
pub type Result<T> = core::result::Result<T, Error>;

/// The unified OSAL error taxonomy.
///
/// Backend-specific return codes are translated into these variants at the
/// backend boundary; no platform error ever leaks through the public API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Error {
    /// Invalid handle, bad enum value, undersized buffer, or an operation
    /// that is invalid for this primitive's configuration (e.g. an ISR
    /// variant on a recursive mutex).
    InvalidArgument,
    /// Unexpected backend failure.
    OsError,
    /// A started run was discarded without being joined.
    ///
    /// The safe thread lifecycle joins on drop, so this crate's own paths
    /// never produce it; the variant exists for API parity with ports where
    /// an unjoined thread is observable.
    ThreadNotJoined,
    /// `start()` called a second time on the same instance.
    ThreadAlreadyStarted,
    /// Unlock attempted by a thread that does not hold the mutex.
    NotOwner,
    /// Unlock attempted on a mutex that is not locked.
    NotLocked,
    /// Non-blocking acquire failed because the resource is held.
    Locked,
    /// The deadline passed before the operation completed.
    Timeout,
    /// A non-recursive mutex was locked twice by the same owner.
    RecursiveUsage,
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Caller violated an API contract.
    Usage,
    /// Resource busy or deadline expired; safe to retry.
    Contention,
    /// Unexpected platform-level fault.
    Platform,
}

impl Error {
    /// Returns the category of this error.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidArgument
            | Self::ThreadNotJoined
            | Self::ThreadAlreadyStarted
            | Self::NotOwner
            | Self::NotLocked
            | Self::RecursiveUsage => ErrorCategory::Usage,
            Self::Locked | Self::Timeout => ErrorCategory::Contention,
            Self::OsError => ErrorCategory::Platform,
        }
    }

    /// Returns true for outcomes that mean "try again later" rather than
    /// "you misused the API": a held lock or an expired deadline.
    #[must_use]
    pub const fn is_would_block(&self) -> bool {
        matches!(self, Self::Locked | Self::Timeout)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument => write!(f, "invalid argument"),
            Self::OsError => write!(f, "unexpected OS error"),
            Self::ThreadNotJoined => write!(f, "thread was not joined"),
            Self::ThreadAlreadyStarted => write!(f, "thread already started"),
            Self::NotOwner => write!(f, "mutex not owned by calling thread"),
            Self::NotLocked => write!(f, "mutex not locked"),
            Self::Locked => write!(f, "resource is locked"),
            Self::Timeout => write!(f, "operation timed out"),
            Self::RecursiveUsage => write!(f, "recursive use of non-recursive mutex"),
        }
    }
}

impl std::error::Error for Error {}
