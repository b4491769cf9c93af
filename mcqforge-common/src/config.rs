//! Bootstrap configuration loading and config file discovery
//!
//! Settings sources priority (resolved per value by the consuming crate):
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Built-in default (fallback)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application directory name under the platform config dir
pub const APP_DIR_NAME: &str = "mcqforge";

/// Config file name looked up inside [`APP_DIR_NAME`]
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Bootstrap configuration loaded from TOML file
///
/// Every field is optional in the file; missing values fall back to the
/// built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Chunk sizing overrides (optional)
    #[serde(default)]
    pub chunking: ChunkingSection,

    /// Event bus buffer capacity
    #[serde(default)]
    pub event_capacity: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// `[chunking]` table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkingSection {
    #[serde(default)]
    pub target_min_tokens: Option<usize>,
    #[serde(default)]
    pub target_max_tokens: Option<usize>,
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Locate the config file to use
///
/// An explicit path must exist; otherwise `<config_dir>/mcqforge/config.toml`
/// is used when present. `Ok(None)` means "run on defaults".
pub fn locate_config_file(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        if path.exists() {
            return Ok(Some(path.to_path_buf()));
        }
        return Err(Error::Config(format!(
            "Config file not found: {}",
            path.display()
        )));
    }

    Ok(default_config_path().filter(|p| p.exists()))
}

/// Platform default config path (may not exist)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load the bootstrap config, falling back to defaults when no file is found
pub fn load_bootstrap_config(explicit: Option<&Path>) -> Result<TomlConfig> {
    match locate_config_file(explicit)? {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading TOML config");
            load_toml_config(&path)
        }
        None => {
            tracing::debug!("No config file found, using built-in defaults");
            Ok(TomlConfig::default())
        }
    }
}
