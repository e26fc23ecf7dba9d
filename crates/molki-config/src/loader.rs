//! Configuration Loader
//!
//! Handles loading and merging configuration from multiple sources with proper precedence.

use crate::runtime::{validate_log_level, RuntimeConfig};
use crate::{ConfigError, ConfigResult};
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit runtime.toml
pub const CONFIG_PATH_VAR: &str = "MOLKI_RUNTIME_CONFIG";
/// Environment variable overriding `diagnostics.level`
pub const LOG_LEVEL_VAR: &str = "MOLKI_LOG";
/// Environment variable overriding `diagnostics.ansi`
pub const LOG_ANSI_VAR: &str = "MOLKI_LOG_ANSI";

const DEFAULT_LOG_LEVEL: &str = "warn";

/// Configuration loader
///
/// Loads configuration from multiple sources and merges them with proper precedence:
/// 1. Global config (~/.molki/runtime.toml) - lowest priority
/// 2. Explicit config (`MOLKI_RUNTIME_CONFIG`) - overrides global
/// 3. Environment variables (`MOLKI_LOG`, `MOLKI_LOG_ANSI`) - highest priority
pub struct ConfigLoader {
    /// Cached global config path
    global_config_path: Option<PathBuf>,
}

/// Merged configuration result
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Merged runtime configuration
    pub runtime: RuntimeConfig,

    /// Files that contributed, in load order
    pub sources: Vec<PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self {
            global_config_path: None,
        }
    }

    /// Use `path` instead of ~/.molki/runtime.toml as the global config
    pub fn with_global_path(path: impl Into<PathBuf>) -> Self {
        Self {
            global_config_path: Some(path.into()),
        }
    }

    /// Load configuration from every source
    ///
    /// A missing global config is not an error. A path named by
    /// `MOLKI_RUNTIME_CONFIG` must exist.
    pub fn load(&mut self) -> ConfigResult<Config> {
        let mut config = Config::default();

        if let Some(path) = self.existing_global_path() {
            config.runtime = RuntimeConfig::load_from_file(&path)?;
            config.sources.push(path);
        }

        if let Some(explicit) = env::var_os(CONFIG_PATH_VAR) {
            let path = PathBuf::from(explicit);
            config.runtime.merge(&RuntimeConfig::load_from_file(&path)?);
            config.sources.push(path);
        }

        self.apply_env_overrides(&mut config.runtime)?;
        Ok(config)
    }

    /// Load configuration from a specific file, then apply environment overrides
    pub fn load_from_file(&mut self, config_path: &Path) -> ConfigResult<Config> {
        let mut runtime = RuntimeConfig::load_from_file(config_path)?;
        self.apply_env_overrides(&mut runtime)?;

        Ok(Config {
            runtime,
            sources: vec![config_path.to_path_buf()],
        })
    }

    /// Global config path if it can be determined and exists
    fn existing_global_path(&mut self) -> Option<PathBuf> {
        if self.global_config_path.is_none() {
            self.global_config_path = Self::global_config_path().ok();
        }

        self.global_config_path
            .as_ref()
            .filter(|path| path.exists())
            .cloned()
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&self, config: &mut RuntimeConfig) -> ConfigResult<()> {
        if let Ok(level) = env::var(LOG_LEVEL_VAR) {
            let level = level.trim().to_lowercase();
            validate_log_level(LOG_LEVEL_VAR, &level)?;
            config
                .diagnostics
                .get_or_insert_with(Default::default)
                .level = Some(level);
        }

        if let Ok(ansi) = env::var(LOG_ANSI_VAR) {
            let ansi_bool = matches!(ansi.to_lowercase().as_str(), "true" | "1" | "yes");
            config.diagnostics.get_or_insert_with(Default::default).ansi = Some(ansi_bool);
        }

        Ok(())
    }

    /// Get the global configuration file path (~/.molki/runtime.toml)
    pub fn global_config_path() -> ConfigResult<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
        Ok(home.join(".molki").join("runtime.toml"))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Effective log level (configured > default "warn")
    pub fn log_level(&self) -> &str {
        self.runtime.level().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    /// Whether diagnostics are colourized (default: false)
    pub fn ansi(&self) -> bool {
        self.runtime.ansi().unwrap_or(false)
    }
}
