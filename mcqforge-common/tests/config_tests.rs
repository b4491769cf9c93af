//! Unit tests for TOML bootstrap config loading

use mcqforge_common::config::{load_bootstrap_config, load_toml_config, locate_config_file, TomlConfig};
use mcqforge_common::Error;
use tempfile::TempDir;

#[test]
fn test_full_config_parses() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
event_capacity = 32

[logging]
level = "debug"

[chunking]
target_min_tokens = 100
target_max_tokens = 400
"#,
    )
    .unwrap();

    let config = load_toml_config(&path).unwrap();
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.chunking.target_min_tokens, Some(100));
    assert_eq!(config.chunking.target_max_tokens, Some(400));
    assert_eq!(config.event_capacity, Some(32));
}

#[test]
fn test_empty_file_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, "").unwrap();

    let config = load_toml_config(&path).unwrap();
    assert_eq!(config, TomlConfig::default());
    assert_eq!(config.logging.level, "info");
    assert!(config.chunking.target_min_tokens.is_none());
}

#[test]
fn test_malformed_file_is_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, "[chunking\ntarget_min_tokens = ").unwrap();

    match load_toml_config(&path) {
        Err(Error::Config(msg)) => assert!(msg.contains("config.toml")),
        other => panic!("expected config error, got {:?}", other),
    }
}

#[test]
fn test_missing_explicit_path_is_error() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("nope.toml");

    assert!(matches!(locate_config_file(Some(&missing)), Err(Error::Config(_))));
    assert!(load_bootstrap_config(Some(&missing)).is_err());
}

#[test]
fn test_explicit_path_wins() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("custom.toml");
    std::fs::write(&path, "[chunking]\ntarget_max_tokens = 9\n").unwrap();

    assert_eq!(locate_config_file(Some(&path)).unwrap(), Some(path.clone()));
    let config = load_bootstrap_config(Some(&path)).unwrap();
    assert_eq!(config.chunking.target_max_tokens, Some(9));
}
