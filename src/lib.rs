//! Osal: one synchronization and timing surface across operating systems.
//!
//! # Overview
//!
//! Application code that must run both on a POSIX host and on a tick-based
//! real-time kernel cannot be written against either platform's native API.
//! This crate gives it a single surface — mutexes, counting semaphores,
//! threads, timeouts, monotonic timestamps — whose observable behavior is
//! identical on every backend, down to each error path.
//!
//! # Core Guarantees
//!
//! - **Backend parity**: every operation returns the same [`Error`] for the
//!   same misuse or contention on every backend
//! - **Deadlines, not delays**: a [`Timeout`] is an absolute deadline fixed
//!   at construction; nested waits consume it instead of restarting it
//! - **Checked ownership**: unlocking a mutex you do not hold is an error,
//!   never undefined behavior
//! - **ISR discipline**: `_isr` operations never block, on any backend
//! - **No panics in the API**: expected outcomes (timeout, already locked)
//!   are ordinary `Result` values
//!
//! # Module Structure
//!
//! - [`error`]: Unified error taxonomy and categories
//! - [`timeout`]: Deadline tracking for blocking operations
//! - [`timestamp`]: Monotonic timestamps and unit conversions
//! - [`mutex`]: Mutual exclusion with ownership tracking and recursion
//! - [`semaphore`]: Counting semaphore
//! - [`thread`]: Thread lifecycle and priorities
//! - [`scoped_lock`]: RAII lock guard over [`mutex::Mutex`]
//! - [`sleep`]: Suspending the calling thread
//! - [`time_format`]: Fixed-width time string rendering
//! - [`config`]: Environment-driven defaults
//! - [`backend`]: Platform backend contract and selection
//!
//! # Backends
//!
//! The `posix` feature (default) targets ordinary OS threads; the `rtos`
//! feature targets a tick-quantized kernel model. Exactly one is active in
//! a build.

pub mod backend;
pub mod config;
pub mod error;
pub mod mutex;
pub mod scoped_lock;
pub mod semaphore;
pub mod sleep;
pub mod thread;
pub mod time_format;
pub mod timeout;
pub mod timestamp;

#[cfg(test)]
pub mod test_utils;

pub use error::{Error, ErrorCategory, Result};
pub use timestamp::{init, shutdown};
pub use mutex::{Mutex, MutexType};
pub use scoped_lock::ScopedLock;
pub use semaphore::Semaphore;
pub use thread::{Thread, ThreadPriority};
pub use timeout::Timeout;
pub use timestamp::Timestamp;
