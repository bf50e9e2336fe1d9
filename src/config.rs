//! Environment variable overrides for OSAL defaults.
//!
//! # Supported Environment Variables
//!
//! | Variable | Type | Maps to |
//! |----------|------|---------|
//! | `OSAL_THREAD_STACK_SIZE` | `usize` | `thread_stack_size` |
//! | `OSAL_THREAD_NAME_PREFIX` | `String` | `thread_name_prefix` |
//!
//! Only variables that are set in the environment are applied. The process
//! snapshot is taken once, on first use, and cached for the process lifetime.

use std::sync::OnceLock;
use thiserror::Error;
use tracing::warn;

/// Environment variable name for the default thread stack size.
pub const ENV_THREAD_STACK_SIZE: &str = "OSAL_THREAD_STACK_SIZE";
/// Environment variable name for the thread name prefix.
pub const ENV_THREAD_NAME_PREFIX: &str = "OSAL_THREAD_NAME_PREFIX";

/// Stack size given to threads that never called `set_stack_size`.
pub const DEFAULT_THREAD_STACK_SIZE: usize = 512 * 1024;
/// Prefix used to name threads that were not named explicitly.
pub const DEFAULT_THREAD_NAME_PREFIX: &str = "osal";

/// A configuration value could not be parsed.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable was set to an unparseable value.
    #[error("invalid value for {var}: expected {expected}, got {value:?}")]
    InvalidValue {
        /// The environment variable name.
        var: &'static str,
        /// Human description of the expected type.
        expected: &'static str,
        /// The rejected raw value.
        value: String,
    },
}

/// Process-wide OSAL defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsalConfig {
    /// Stack size for threads spawned without an explicit size.
    pub thread_stack_size: usize,
    /// Prefix for auto-generated thread names.
    pub thread_name_prefix: String,
}

impl Default for OsalConfig {
    fn default() -> Self {
        Self {
            thread_stack_size: DEFAULT_THREAD_STACK_SIZE,
            thread_name_prefix: DEFAULT_THREAD_NAME_PREFIX.to_owned(),
        }
    }
}

impl OsalConfig {
    /// Builds a config from defaults plus any environment overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        apply_env_overrides(&mut config)?;
        Ok(config)
    }
}

/// Apply environment variable overrides to an [`OsalConfig`].
///
/// Returns an error if a variable is set but contains an unparseable value.
pub fn apply_env_overrides(config: &mut OsalConfig) -> Result<(), ConfigError> {
    if let Some(val) = read_env(ENV_THREAD_STACK_SIZE) {
        config.thread_stack_size = parse_usize(ENV_THREAD_STACK_SIZE, &val)?;
    }
    if let Some(val) = read_env(ENV_THREAD_NAME_PREFIX) {
        config.thread_name_prefix = val;
    }
    Ok(())
}

/// The cached process-wide config snapshot.
///
/// An unparseable override is logged and ignored; the defaults win.
pub(crate) fn global() -> &'static OsalConfig {
    static CONFIG: OnceLock<OsalConfig> = OnceLock::new();
    CONFIG.get_or_init(|| match OsalConfig::from_env() {
        Ok(config) => config,
        Err(error) => {
            warn!(%error, "ignoring invalid OSAL environment override");
            OsalConfig::default()
        }
    })
}

/// Read an environment variable, returning `None` if unset.
fn read_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn parse_usize(var: &'static str, val: &str) -> Result<usize, ConfigError> {
    val.trim()
        .parse::<usize>()
        .map_err(|_| ConfigError::InvalidValue {
            var,
            expected: "unsigned integer",
            value: val.to_owned(),
        })
}
