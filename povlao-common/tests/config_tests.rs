//! Root folder resolution and config file loading
//!
//! Tests that touch environment variables are marked `#[serial]` so they do
//! not race each other.

use povlao_common::config::{
    load_toml_config, CompiledDefaults, RootFolderInitializer, RootFolderResolver, TomlConfig,
};
use serial_test::serial;
use std::env;
use std::path::{Path, PathBuf};

const TEST_ENV: &str = "POVLAO_TEST_ROOT_FOLDER";

#[test]
#[serial]
fn test_cli_argument_wins_over_everything() {
    env::set_var(TEST_ENV, "/tmp/from-env");
    let toml = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/from-toml")),
        ..Default::default()
    };

    let resolved = RootFolderResolver::new(Some(Path::new("/tmp/from-cli")), &toml)
        .with_env_var(TEST_ENV)
        .resolve();

    assert_eq!(resolved, PathBuf::from("/tmp/from-cli"));
    env::remove_var(TEST_ENV);
}

#[test]
#[serial]
fn test_env_wins_over_toml() {
    env::set_var(TEST_ENV, "/tmp/from-env");
    let toml = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/from-toml")),
        ..Default::default()
    };

    let resolved = RootFolderResolver::new(None, &toml)
        .with_env_var(TEST_ENV)
        .resolve();

    assert_eq!(resolved, PathBuf::from("/tmp/from-env"));
    env::remove_var(TEST_ENV);
}

#[test]
#[serial]
fn test_toml_then_compiled_default() {
    env::remove_var(TEST_ENV);

    let toml = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/from-toml")),
        ..Default::default()
    };
    let resolved = RootFolderResolver::new(None, &toml)
        .with_env_var(TEST_ENV)
        .resolve();
    assert_eq!(resolved, PathBuf::from("/tmp/from-toml"));

    let empty = TomlConfig::default();
    let resolved = RootFolderResolver::new(None, &empty)
        .with_env_var(TEST_ENV)
        .resolve();
    assert_eq!(resolved, CompiledDefaults::for_current_platform().root_folder);
}

#[test]
fn test_missing_config_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_toml_config(Some(&dir.path().join("nope.toml"))).unwrap();
    assert!(config.port.is_none());
    assert!(config.root_folder.is_none());
}

#[test]
fn test_existing_config_file_is_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "recent_capacity = 50\nlog_level = \"debug\"\n").unwrap();

    let config = load_toml_config(Some(&path)).unwrap();
    assert_eq!(config.recent_capacity, Some(50));
    assert_eq!(config.log_level.as_deref(), Some("debug"));
}

#[test]
fn test_initializer_creates_missing_root() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("nested").join("root");
    let init = RootFolderInitializer::new(root.clone());

    init.ensure_directory_exists().unwrap();
    assert!(root.is_dir());
    // Idempotent
    init.ensure_directory_exists().unwrap();
}
