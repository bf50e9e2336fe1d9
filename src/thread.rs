//! Thread lifecycle: create, start, join.
//!
//! A [`Thread`] is a one-shot launcher: priority and stack size are
//! configured up front, `start` hands the entry closure to the backend
//! exactly once, and `join` blocks until it returns. Each instance runs at
//! most once; a second `start` is rejected even after a join. Dropping a
//! started, unjoined thread joins it first, so a running thread is never
//! silently leaked.

use crate::backend::active;
use crate::config;
use crate::error::{Error, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

/// Scheduling priority class, mapped onto the backend-native range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ThreadPriority {
    /// Bottom of the native priority range.
    Lowest,
    /// Between lowest and normal.
    Low,
    /// Midpoint of the native range.
    #[default]
    Normal,
    /// Between normal and highest.
    High,
    /// Top of the native priority range.
    Highest,
}

impl ThreadPriority {
    /// All priority classes, lowest first.
    pub const ALL: [Self; 5] = [
        Self::Lowest,
        Self::Low,
        Self::Normal,
        Self::High,
        Self::Highest,
    ];

    /// Interpolation step of this class: 0 for lowest through 4 for highest.
    #[must_use]
    pub const fn level(self) -> u8 {
        match self {
            Self::Lowest => 0,
            Self::Low => 1,
            Self::Normal => 2,
            Self::High => 3,
            Self::Highest => 4,
        }
    }
}

/// Launch parameters handed to the backend spawner.
#[derive(Debug, Clone)]
pub struct SpawnSpec {
    /// Thread name, visible to OS tooling.
    pub name: String,
    /// Stack size in bytes.
    pub stack_size: usize,
    /// Scheduling priority class.
    pub priority: ThreadPriority,
}

/// A configurable, joinable thread.
///
/// Move-only; a moved-from binding cannot be touched again, so there is no
/// runtime "stale handle" error path.
#[derive(Debug)]
pub struct Thread {
    priority: ThreadPriority,
    stack_size: usize,
    name: Option<String>,
    // Sticky: set by the first start and never cleared.
    started: bool,
    handle: Option<active::RawThread>,
}

impl Thread {
    /// Creates a thread with normal priority and the configured default
    /// stack size. Nothing runs until [`start`](Self::start).
    #[must_use]
    pub fn new() -> Self {
        Self::with_priority(ThreadPriority::default())
    }

    /// Creates a thread with the given priority class.
    #[must_use]
    pub fn with_priority(priority: ThreadPriority) -> Self {
        Self {
            priority,
            stack_size: config::global().thread_stack_size,
            name: None,
            started: false,
            handle: None,
        }
    }

    /// Sets the stack size for the next start. Has no effect on a run that
    /// is already in flight.
    pub fn set_stack_size(&mut self, bytes: usize) {
        self.stack_size = bytes;
    }

    /// Names the thread for OS tooling. Unnamed threads get a generated
    /// `<prefix>-<n>` name at start.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// The configured priority class.
    #[must_use]
    pub const fn priority(&self) -> ThreadPriority {
        self.priority
    }

    /// Whether this instance has ever been started.
    #[must_use]
    pub const fn is_started(&self) -> bool {
        self.started
    }

    /// Launches `entry` on a new thread.
    ///
    /// Each instance starts at most once; the rejection is permanent, a join
    /// does not re-arm it.
    ///
    /// # Errors
    ///
    /// [`Error::ThreadAlreadyStarted`] if this instance was started before;
    /// [`Error::OsError`] if the platform refuses to spawn.
    pub fn start<F>(&mut self, entry: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        if self.started {
            return Err(Error::ThreadAlreadyStarted);
        }

        let spec = SpawnSpec {
            name: self.name.clone().unwrap_or_else(generated_name),
            stack_size: self.stack_size,
            priority: self.priority,
        };
        self.handle = Some(active::spawn(spec, Box::new(entry))?);
        self.started = true;
        Ok(())
    }

    /// Blocks until the entry function returns.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if the thread was never started;
    /// [`Error::OsError`] on a second join (the handle is already consumed)
    /// or if the entry function panicked.
    pub fn join(&mut self) -> Result<()> {
        match self.handle.take() {
            Some(handle) => match handle.join() {
                crate::backend::BackendStatus::Ok => Ok(()),
                status => {
                    trace!(?status, "thread join reported a fault");
                    Err(Error::OsError)
                }
            },
            None if self.started => Err(Error::OsError),
            None => Err(Error::InvalidArgument),
        }
    }
}

impl Default for Thread {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Thread {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            trace!("joining thread on drop");
            let _ = handle.join();
        }
    }
}

fn generated_name() -> String {
    static NEXT: AtomicU64 = AtomicU64::new(0);
    let n = NEXT.fetch_add(1, Ordering::Relaxed);
    format!("{}-{n}", config::global().thread_name_prefix)
}

/// Yields the calling thread to the scheduler.
pub fn yield_now() {
    active::yield_now();
}

/// Identity of the calling thread.
///
/// Stable for the thread's lifetime and unique among live threads.
#[must_use]
pub fn current_id() -> u64 {
    active::current_id()
}
