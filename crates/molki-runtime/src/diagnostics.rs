//! Diagnostic logging for the runtime itself.
//!
//! Everything goes to standard error. Standard output carries the generated
//! program's bytes and nothing else.

use molki_config::Config;
use std::str::FromStr;
use thiserror::Error;
use tracing_subscriber::filter::LevelFilter;

#[derive(Debug, Error)]
pub enum DiagnosticsError {
    #[error("invalid log level '{0}'")]
    InvalidLevel(String),

    #[error("a global tracing subscriber is already installed")]
    AlreadyInstalled,
}

/// Parse a configured level name (`off`, `error`, ... `trace`)
pub fn level_filter(level: &str) -> Result<LevelFilter, DiagnosticsError> {
    LevelFilter::from_str(level).map_err(|_| DiagnosticsError::InvalidLevel(level.to_string()))
}

/// Install the process-wide stderr subscriber described by `config`.
pub fn install(config: &Config) -> Result<(), DiagnosticsError> {
    let level = level_filter(config.log_level())?;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_ansi(config.ansi())
        .with_target(false)
        .try_init()
        .map_err(|_| DiagnosticsError::AlreadyInstalled)
}
