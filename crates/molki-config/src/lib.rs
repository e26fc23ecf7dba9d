//! Molki Runtime Configuration
//!
//! Configuration for the runtime support library linked into generated
//! programs. The only tunable surface is diagnostics: the calling convention
//! itself (symbols, offsets, exit status) is fixed and never configurable.
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded and merged in the following order (later overrides earlier):
//! 1. Global config (~/.molki/runtime.toml)
//! 2. Explicit config file named by `MOLKI_RUNTIME_CONFIG`
//! 3. Environment variables (`MOLKI_LOG`, `MOLKI_LOG_ANSI`)
//!
//! # Example
//!
//! ```no_run
//! use molki_config::ConfigLoader;
//!
//! let mut loader = ConfigLoader::new();
//! let config = loader.load().unwrap();
//! println!("log level: {}", config.log_level());
//! ```

pub mod loader;
pub mod runtime;

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax in {file}: {error}")]
    TomlParseError {
        file: PathBuf,
        error: toml::de::Error,
    },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Home directory not found")]
    HomeNotFound,
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

// Re-export main types
pub use loader::{Config, ConfigLoader};
pub use runtime::{DiagnosticsConfig, RuntimeConfig};
