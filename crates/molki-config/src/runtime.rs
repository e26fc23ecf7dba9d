//! Runtime Configuration (runtime.toml)
//!
//! The TOML document read from `~/.molki/runtime.toml` or from the file named
//! by `MOLKI_RUNTIME_CONFIG`.

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Levels accepted by `diagnostics.level`, most to least quiet.
pub const LOG_LEVELS: &[&str] = &["off", "error", "warn", "info", "debug", "trace"];

/// Runtime configuration from a runtime.toml file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Diagnostic logging settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<DiagnosticsConfig>,
}

/// Diagnostic logging settings
///
/// Diagnostics always go to standard error; standard output belongs to the
/// generated program.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct DiagnosticsConfig {
    /// Maximum level emitted (default: "warn")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    /// Colourize output with ANSI escapes (default: false)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ansi: Option<bool>,
}

impl RuntimeConfig {
    /// Load runtime configuration from a file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
            file: path.to_path_buf(),
            error: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the runtime configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(level) = self.level() {
            validate_log_level("diagnostics.level", level)?;
        }
        Ok(())
    }

    /// Configured log level, if any
    pub fn level(&self) -> Option<&str> {
        self.diagnostics.as_ref().and_then(|d| d.level.as_deref())
    }

    /// Configured ANSI setting, if any
    pub fn ansi(&self) -> Option<bool> {
        self.diagnostics.as_ref().and_then(|d| d.ansi)
    }

    /// Merge another runtime config into this one
    ///
    /// Other config takes precedence field by field for non-None values.
    pub fn merge(&mut self, other: &RuntimeConfig) {
        let Some(theirs) = &other.diagnostics else {
            return;
        };
        let ours = self.diagnostics.get_or_insert_with(Default::default);
        if theirs.level.is_some() {
            ours.level = theirs.level.clone();
        }
        if theirs.ansi.is_some() {
            ours.ansi = theirs.ansi;
        }
    }
}

/// Validate a log level value
pub(crate) fn validate_log_level(field: &str, value: &str) -> ConfigResult<()> {
    if !LOG_LEVELS.contains(&value) {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: format!("must be one of {}, got '{}'", LOG_LEVELS.join(", "), value),
        });
    }
    Ok(())
}
