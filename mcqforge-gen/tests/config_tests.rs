//! Chunking configuration resolution tests
//!
//! Priority per value: CLI → ENV → TOML → default. Tests that touch the
//! MCQFORGE_* environment variables are marked #[serial].

use mcqforge_common::config::{load_bootstrap_config, TomlConfig};
use mcqforge_gen::config::{
    resolve_chunking_config, ChunkingConfig, ENV_TARGET_MAX_TOKENS, ENV_TARGET_MIN_TOKENS,
};
use serial_test::serial;
use std::io::Write;
use tempfile::NamedTempFile;

fn clear_env() {
    std::env::remove_var(ENV_TARGET_MIN_TOKENS);
    std::env::remove_var(ENV_TARGET_MAX_TOKENS);
}

fn toml_with(min: Option<usize>, max: Option<usize>) -> TomlConfig {
    let mut config = TomlConfig::default();
    config.chunking.target_min_tokens = min;
    config.chunking.target_max_tokens = max;
    config
}

#[test]
#[serial]
fn test_defaults_when_nothing_set() {
    clear_env();
    let config = resolve_chunking_config(None, None, &TomlConfig::default()).unwrap();
    assert_eq!(config, ChunkingConfig::default());
}

#[test]
#[serial]
fn test_toml_used_when_env_absent() {
    clear_env();
    let config = resolve_chunking_config(None, None, &toml_with(Some(200), Some(400))).unwrap();
    assert_eq!(config.target_min_tokens, 200);
    assert_eq!(config.target_max_tokens, 400);
}

#[test]
#[serial]
fn test_env_overrides_toml() {
    clear_env();
    std::env::set_var(ENV_TARGET_MIN_TOKENS, "300");

    let config = resolve_chunking_config(None, None, &toml_with(Some(200), Some(400))).unwrap();
    assert_eq!(config.target_min_tokens, 300);
    assert_eq!(config.target_max_tokens, 400);

    clear_env();
}

#[test]
#[serial]
fn test_cli_overrides_env() {
    clear_env();
    std::env::set_var(ENV_TARGET_MAX_TOKENS, "900");

    let config =
        resolve_chunking_config(Some(10), Some(50), &toml_with(Some(200), Some(400))).unwrap();
    assert_eq!(config.target_min_tokens, 10);
    assert_eq!(config.target_max_tokens, 50);

    clear_env();
}

#[test]
#[serial]
fn test_unparseable_env_falls_through_to_toml() {
    clear_env();
    std::env::set_var(ENV_TARGET_MIN_TOKENS, "lots");

    let config = resolve_chunking_config(None, None, &toml_with(Some(250), None)).unwrap();
    assert_eq!(config.target_min_tokens, 250);
    assert_eq!(config.target_max_tokens, 10000);

    clear_env();
}

#[test]
#[serial]
fn test_inverted_resolution_is_config_error() {
    clear_env();
    let result = resolve_chunking_config(Some(500), Some(100), &TomlConfig::default());
    assert!(matches!(result, Err(mcqforge_common::Error::Config(_))));
}

#[test]
#[serial]
fn test_toml_file_feeds_resolution() {
    clear_env();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "event_capacity = 32\n\n[logging]\nlevel = \"debug\"\n\n[chunking]\ntarget_min_tokens = 1200\ntarget_max_tokens = 2400"
    )
    .unwrap();

    let toml_config = load_bootstrap_config(Some(file.path())).unwrap();
    assert_eq!(toml_config.logging.level, "debug");

    let config = resolve_chunking_config(None, Some(3000), &toml_config).unwrap();
    assert_eq!(config.target_min_tokens, 1200);
    assert_eq!(config.target_max_tokens, 3000);
    assert_eq!(mcqforge_gen::config::resolve_event_capacity(&toml_config), 32);
}
