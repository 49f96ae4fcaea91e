//! Unit tests for configuration and graceful degradation
//!
//! Tests that manipulate LUCKY_WHEEL_* environment variables are marked with
//! #[serial] so they never run in parallel with each other.

use serial_test::serial;
use std::env;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use lucky_common::config::{
    default_data_dir, load_admin_credentials, resolve_config_path, resolve_data_dir,
    StorageBackend, TomlConfig, ADMIN_FILE, CONFIG_ENV, DATA_DIR_ENV,
};
use lucky_common::Error;

#[test]
fn test_defaults_when_file_missing() {
    let dir = TempDir::new().unwrap();
    let config = TomlConfig::load(&dir.path().join("nope.toml")).unwrap();

    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.port, 3000);
    assert_eq!(config.storage.backend, StorageBackend::Sqlite);
    assert_eq!(config.session.ttl().num_minutes(), 30);
    assert_eq!(config.logging.level, "info");
    assert!(config.admin.is_none());
    assert!(config.static_dir.is_none());
}

#[test]
fn test_full_toml_parses() {
    let config = TomlConfig::from_toml_str(
        r#"
        host = "127.0.0.1"
        port = 8080
        data_dir = "/srv/lucky"
        static_dir = "/srv/lucky/public"

        [storage]
        backend = "json"

        [admin]
        username = "boss"
        password = "s3cret"

        [session]
        ttl_minutes = 5

        [logging]
        level = "debug"
        "#,
    )
    .unwrap();

    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 8080);
    assert_eq!(config.data_dir, Some(PathBuf::from("/srv/lucky")));
    assert_eq!(config.static_dir, Some(PathBuf::from("/srv/lucky/public")));
    assert_eq!(config.storage.backend, StorageBackend::Json);
    assert_eq!(config.admin.as_ref().unwrap().username, "boss");
    assert_eq!(config.session.ttl().num_minutes(), 5);
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_invalid_toml_is_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "port = \"not a number\"").unwrap();

    assert!(matches!(TomlConfig::load(&path), Err(Error::Config(_))));
}

#[test]
fn test_non_positive_ttl_rejected() {
    let result = TomlConfig::from_toml_str("[session]\nttl_minutes = 0\n");
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_oversized_ttl_rejected() {
    let result = TomlConfig::from_toml_str("[session]\nttl_minutes = 9000000000000000000\n");
    assert!(matches!(result, Err(Error::Config(_))));

    // Built directly, an out-of-range value falls back instead of panicking
    let session = lucky_common::config::SessionConfig {
        ttl_minutes: i64::MAX,
    };
    assert_eq!(session.ttl().num_minutes(), 30);
}

#[test]
fn test_storage_backend_from_str() {
    assert_eq!("SQLite".parse::<StorageBackend>().unwrap(), StorageBackend::Sqlite);
    assert_eq!("json".parse::<StorageBackend>().unwrap(), StorageBackend::Json);
    assert_eq!("memory".parse::<StorageBackend>().unwrap(), StorageBackend::Memory);
    assert!("redis".parse::<StorageBackend>().is_err());
}

#[test]
#[serial]
fn test_data_dir_priority() {
    env::remove_var(DATA_DIR_ENV);
    let mut config = TomlConfig::default();

    // Nothing set: OS default
    assert_eq!(resolve_data_dir(None, &config), default_data_dir());

    // TOML beats default
    config.data_dir = Some(PathBuf::from("/from/toml"));
    assert_eq!(resolve_data_dir(None, &config), PathBuf::from("/from/toml"));

    // Environment beats TOML
    env::set_var(DATA_DIR_ENV, "/from/env");
    assert_eq!(resolve_data_dir(None, &config), PathBuf::from("/from/env"));

    // CLI beats everything
    assert_eq!(
        resolve_data_dir(Some(Path::new("/from/cli")), &config),
        PathBuf::from("/from/cli")
    );

    env::remove_var(DATA_DIR_ENV);
}

#[test]
#[serial]
fn test_config_path_priority() {
    env::remove_var(CONFIG_ENV);
    assert_eq!(
        resolve_config_path(Some(Path::new("/cli/config.toml"))),
        Some(PathBuf::from("/cli/config.toml"))
    );

    env::set_var(CONFIG_ENV, "/env/config.toml");
    assert_eq!(resolve_config_path(None), Some(PathBuf::from("/env/config.toml")));
    env::remove_var(CONFIG_ENV);
}

#[test]
fn test_admin_credentials_from_toml_win() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(ADMIN_FILE),
        r#"{"username": "file", "password": "file"}"#,
    )
    .unwrap();

    let config = TomlConfig::from_toml_str("[admin]\nusername = \"toml\"\npassword = \"pw\"\n").unwrap();
    let creds = load_admin_credentials(&config, dir.path()).unwrap().unwrap();
    assert_eq!(creds.username, "toml");
}

#[test]
fn test_admin_credentials_from_admin_json() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(ADMIN_FILE),
        r#"{"username": "admin", "password": "letmein"}"#,
    )
    .unwrap();

    let creds = load_admin_credentials(&TomlConfig::default(), dir.path())
        .unwrap()
        .unwrap();
    assert_eq!(creds.username, "admin");
    assert_eq!(creds.password, "letmein");
}

#[test]
fn test_admin_credentials_absent_or_incomplete() {
    let dir = TempDir::new().unwrap();
    assert!(load_admin_credentials(&TomlConfig::default(), dir.path())
        .unwrap()
        .is_none());

    std::fs::write(dir.path().join(ADMIN_FILE), "{}").unwrap();
    assert!(load_admin_credentials(&TomlConfig::default(), dir.path())
        .unwrap()
        .is_none());

    std::fs::write(dir.path().join(ADMIN_FILE), "not json").unwrap();
    assert!(matches!(
        load_admin_credentials(&TomlConfig::default(), dir.path()),
        Err(Error::Config(_))
    ));
}
