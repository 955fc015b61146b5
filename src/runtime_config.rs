//! # Runtime Configuration Module
//!
//! Environment-variable defaults for mock generation limits.
//!
//! ## Environment Variables
//!
//! ### `ROUTEWIRE_MAX_DEPTH`
//!
//! Default recursion depth limit for the mock generator. Recursive schemas
//! are cut at this depth and replaced with a null sentinel. Default: `10`.
//!
//! ### `ROUTEWIRE_ARRAY_LENGTH`
//!
//! Default element count for generated arrays whose schema declares no
//! length bounds. Default: `3`.
//!
//! ## Usage
//!
//! ```rust
//! use routewire::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! assert!(config.max_depth >= 1);
//! ```

use std::env;

/// Default generator depth limit when `ROUTEWIRE_MAX_DEPTH` is unset.
pub const DEFAULT_MAX_DEPTH: usize = 10;
/// Default generated array length when `ROUTEWIRE_ARRAY_LENGTH` is unset.
pub const DEFAULT_ARRAY_LENGTH: usize = 3;

/// Generation limits loaded from environment variables.
///
/// Load this at startup with [`RuntimeConfig::from_env()`]; unparsable or
/// missing values fall back to the defaults.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeConfig {
    /// Recursion depth limit for mock generation.
    pub max_depth: usize,
    /// Element count for unconstrained generated arrays.
    pub array_length: usize,
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        RuntimeConfig {
            max_depth: read_usize("ROUTEWIRE_MAX_DEPTH", DEFAULT_MAX_DEPTH),
            array_length: read_usize("ROUTEWIRE_ARRAY_LENGTH", DEFAULT_ARRAY_LENGTH),
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            max_depth: DEFAULT_MAX_DEPTH,
            array_length: DEFAULT_ARRAY_LENGTH,
        }
    }
}

fn read_usize(var: &str, default: usize) -> usize {
    match env::var(var) {
        Ok(val) => val.parse().unwrap_or(default),
        Err(_) => default,
    }
}
