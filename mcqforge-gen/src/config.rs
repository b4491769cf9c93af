//! Configuration resolution for mcqforge-gen
//!
//! Each chunking value is resolved independently with priority
//! CLI → ENV → TOML → built-in default.

use mcqforge_common::config::TomlConfig;
use mcqforge_common::{Error, Result};
use tracing::{info, warn};

pub const DEFAULT_TARGET_MIN_TOKENS: usize = 5000;
pub const DEFAULT_TARGET_MAX_TOKENS: usize = 10000;
pub const DEFAULT_EVENT_CAPACITY: usize = 100;

pub const ENV_TARGET_MIN_TOKENS: &str = "MCQFORGE_TARGET_MIN_TOKENS";
pub const ENV_TARGET_MAX_TOKENS: &str = "MCQFORGE_TARGET_MAX_TOKENS";

/// Chunk sizing parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkingConfig {
    pub target_min_tokens: usize,
    pub target_max_tokens: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            target_min_tokens: DEFAULT_TARGET_MIN_TOKENS,
            target_max_tokens: DEFAULT_TARGET_MAX_TOKENS,
        }
    }
}

impl ChunkingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.target_min_tokens == 0 || self.target_max_tokens == 0 {
            return Err(Error::Config(
                "chunk token targets must be at least 1".to_string(),
            ));
        }
        if self.target_min_tokens > self.target_max_tokens {
            return Err(Error::Config(format!(
                "target_min_tokens ({}) exceeds target_max_tokens ({})",
                self.target_min_tokens, self.target_max_tokens
            )));
        }
        Ok(())
    }
}

/// Resolve chunking config from CLI overrides, environment and TOML
pub fn resolve_chunking_config(
    cli_min: Option<usize>,
    cli_max: Option<usize>,
    toml_config: &TomlConfig,
) -> Result<ChunkingConfig> {
    let config = ChunkingConfig {
        target_min_tokens: resolve_value(
            "target_min_tokens",
            cli_min,
            ENV_TARGET_MIN_TOKENS,
            toml_config.chunking.target_min_tokens,
            DEFAULT_TARGET_MIN_TOKENS,
        ),
        target_max_tokens: resolve_value(
            "target_max_tokens",
            cli_max,
            ENV_TARGET_MAX_TOKENS,
            toml_config.chunking.target_max_tokens,
            DEFAULT_TARGET_MAX_TOKENS,
        ),
    };
    config.validate()?;
    Ok(config)
}

fn resolve_value(
    name: &str,
    cli: Option<usize>,
    env_var: &str,
    toml: Option<usize>,
    default: usize,
) -> usize {
    if let Some(value) = cli {
        info!(setting = name, value, "Loaded from command line");
        return value;
    }

    if let Ok(raw) = std::env::var(env_var) {
        match raw.trim().parse::<usize>() {
            Ok(value) => {
                info!(setting = name, value, "Loaded from environment variable");
                return value;
            }
            Err(_) => warn!(
                setting = name,
                env_var,
                raw = %raw,
                "Ignoring unparseable environment value"
            ),
        }
    }

    if let Some(value) = toml {
        info!(setting = name, value, "Loaded from TOML config");
        return value;
    }

    default
}

/// Event bus capacity from TOML, or the default
pub fn resolve_event_capacity(toml_config: &TomlConfig) -> usize {
    toml_config
        .event_capacity
        .filter(|&c| c > 0)
        .unwrap_or(DEFAULT_EVENT_CAPACITY)
}
