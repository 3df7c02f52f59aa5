//! Configuration resolution tests
//!
//! Tests that manipulate MOODLY_ROOT_FOLDER are marked #[serial] so they
//! don't race each other on the process environment.

use moodly_common::config::{
    CompiledDefaults, RootFolderInitializer, RootFolderResolver, TomlConfig, ROOT_FOLDER_ENV,
};
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_compiled_defaults_for_current_platform() {
    let defaults = CompiledDefaults::for_current_platform();

    assert!(!defaults.root_folder.as_os_str().is_empty());
    assert_eq!(defaults.log_level, "info");
    assert_eq!(defaults.port, 5830);
    assert!(!defaults.demo_mode);

    #[cfg(target_os = "linux")]
    {
        let path_str = defaults.root_folder.to_string_lossy();
        assert!(path_str.contains("moodly"), "Linux default should end in moodly");
    }
}

#[test]
#[serial]
fn test_resolver_with_no_overrides_uses_default() {
    env::remove_var(ROOT_FOLDER_ENV);

    let root_folder = RootFolderResolver::new("test-module").resolve();
    assert_eq!(root_folder, CompiledDefaults::for_current_platform().root_folder);
}

#[test]
#[serial]
fn test_resolver_env_var() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/moodly-test-env-folder");

    let root_folder = RootFolderResolver::new("test-module").resolve();
    assert_eq!(root_folder, PathBuf::from("/tmp/moodly-test-env-folder"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_resolver_cli_beats_env_and_config() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/from-env");
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/from-config")),
        ..Default::default()
    };

    let root_folder = RootFolderResolver::new("test-module")
        .with_cli_arg(Some(PathBuf::from("/tmp/from-cli")))
        .with_config(Some(config))
        .resolve();
    assert_eq!(root_folder, PathBuf::from("/tmp/from-cli"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_resolver_env_beats_config() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/from-env");
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/from-config")),
        ..Default::default()
    };

    let root_folder = RootFolderResolver::new("test-module")
        .with_config(Some(config))
        .resolve();
    assert_eq!(root_folder, PathBuf::from("/tmp/from-env"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_resolver_config_used_without_env() {
    env::remove_var(ROOT_FOLDER_ENV);
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/from-config")),
        ..Default::default()
    };

    let root_folder = RootFolderResolver::new("test-module")
        .with_config(Some(config))
        .resolve();
    assert_eq!(root_folder, PathBuf::from("/tmp/from-config"));
}

#[test]
fn test_toml_config_load_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(
        &path,
        "root_folder = \"/srv/moodly\"\nport = 6000\nlog_level = \"debug\"\nprofile_cache_ttl_secs = 60\n",
    )
    .unwrap();

    let config = TomlConfig::load(&path).unwrap();
    assert_eq!(config.root_folder, Some(PathBuf::from("/srv/moodly")));
    assert_eq!(config.port, Some(6000));
    assert_eq!(config.log_level.as_deref(), Some("debug"));
    assert_eq!(config.profile_cache_ttl_secs, Some(60));
}

#[test]
fn test_toml_config_missing_file_is_error_not_panic() {
    let temp_dir = TempDir::new().unwrap();
    assert!(TomlConfig::load(&temp_dir.path().join("absent.toml")).is_err());
}

#[test]
fn test_initializer_creates_directory() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("nested").join("moodly");

    let initializer = RootFolderInitializer::new(root.clone());
    initializer.ensure_directory_exists().unwrap();

    assert!(root.is_dir());
    assert_eq!(initializer.database_path(), root.join("moodly.db"));
}

#[test]
fn test_initializer_rejects_file_as_root() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("not-a-dir");
    std::fs::write(&file, "x").unwrap();

    assert!(RootFolderInitializer::new(file).ensure_directory_exists().is_err());
}

#[test]
fn test_load_from_explicit_path() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("custom.toml");
    std::fs::write(&path, "demo_mode = true\n").unwrap();

    let config = TomlConfig::load_from(Some(&path)).unwrap().unwrap();
    assert_eq!(config.demo_mode, Some(true));

    let missing = TomlConfig::load_from(Some(&temp_dir.path().join("absent.toml")));
    assert!(matches!(missing, Err(moodly_common::Error::Config(_))));
}
