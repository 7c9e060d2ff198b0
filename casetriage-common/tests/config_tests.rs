//! Integration tests for configuration loading and input resolution
//!
//! Tests that touch CASETRIAGE_CONFIG or CASETRIAGE_INPUT are marked #[serial]
//! so they do not race on process environment.

use casetriage_common::config::{
    load_config, load_toml_config, resolve_config_path, resolve_input_path, TomlConfig,
    CONFIG_ENV_VAR, INPUT_ENV_VAR,
};
use casetriage_common::Error;
use serial_test::serial;
use std::env;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[test]
fn test_load_full_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
input = "/srv/cases/20April.csv"
search_paths = ["/srv/cases/latest.csv", "./20April.csv"]

[logging]
level = "casetriage_ingest=debug"

[ingest]
date_format = "%d-%m-%Y"
fallback_encodings = ["utf-8", "windows-1256"]
na_tokens = ["NA"]
join_delimiter = "; "
parallel_threshold = 64
"#,
    )
    .unwrap();

    let config = load_toml_config(&path).unwrap();

    assert_eq!(config.input, Some(PathBuf::from("/srv/cases/20April.csv")));
    assert_eq!(config.search_paths.len(), 2);
    assert_eq!(config.logging.level, "casetriage_ingest=debug");
    assert_eq!(config.ingest.date_format.as_deref(), Some("%d-%m-%Y"));
    assert_eq!(
        config.ingest.fallback_encodings,
        Some(vec!["utf-8".to_string(), "windows-1256".to_string()])
    );
    assert_eq!(config.ingest.na_tokens, Some(vec!["NA".to_string()]));
    assert_eq!(config.ingest.join_delimiter.as_deref(), Some("; "));
    assert_eq!(config.ingest.parallel_threshold, Some(64));
}

#[test]
fn test_missing_config_file_falls_back_to_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("absent.toml");

    let config = load_config(Some(&path)).unwrap();
    assert_eq!(config, TomlConfig::default());
}

#[test]
fn test_malformed_config_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.toml");
    std::fs::write(&path, "search_paths = [unterminated").unwrap();

    let result = load_config(Some(&path));
    match result {
        Err(Error::Config(msg)) => assert!(msg.contains("Parse TOML failed")),
        other => panic!("Expected Config error, got {:?}", other),
    }
}

#[test]
fn test_unreadable_config_path_is_io_error() {
    // A directory exists but cannot be read as a file
    let temp_dir = TempDir::new().unwrap();

    match load_config(Some(temp_dir.path())) {
        Err(Error::Io { path, .. }) => assert_eq!(path, temp_dir.path().display().to_string()),
        other => panic!("Expected Io error, got {:?}", other),
    }
}

#[test]
#[serial]
fn test_config_path_env_var() {
    env::set_var(CONFIG_ENV_VAR, "/tmp/casetriage-env.toml");

    let path = resolve_config_path(None);
    assert_eq!(path, Some(PathBuf::from("/tmp/casetriage-env.toml")));

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_config_path_cli_beats_env_var() {
    env::set_var(CONFIG_ENV_VAR, "/tmp/casetriage-env.toml");

    let path = resolve_config_path(Some(Path::new("/tmp/casetriage-cli.toml")));
    assert_eq!(path, Some(PathBuf::from("/tmp/casetriage-cli.toml")));

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_input_priority_order() {
    env::remove_var(INPUT_ENV_VAR);

    let config = TomlConfig {
        input: Some(PathBuf::from("/from/toml.csv")),
        ..TomlConfig::default()
    };

    // TOML only
    assert_eq!(
        resolve_input_path(None, &config),
        Some(PathBuf::from("/from/toml.csv"))
    );

    // Environment beats TOML
    env::set_var(INPUT_ENV_VAR, "/from/env.csv");
    assert_eq!(
        resolve_input_path(None, &config),
        Some(PathBuf::from("/from/env.csv"))
    );

    // Command line beats everything
    assert_eq!(
        resolve_input_path(Some(Path::new("/from/cli.csv")), &config),
        Some(PathBuf::from("/from/cli.csv"))
    );

    env::remove_var(INPUT_ENV_VAR);
}

#[test]
#[serial]
fn test_input_unresolved_without_any_source() {
    env::remove_var(INPUT_ENV_VAR);

    let config = TomlConfig::default();
    assert_eq!(resolve_input_path(None, &config), None);
}
