//! Configuration loading and data folder resolution
//!
//! Bootstrap configuration comes from an optional TOML file. Every field has a
//! built-in default, so a missing file only produces a warning.
//!
//! Data folder priority:
//! 1. Command-line argument (highest priority)
//! 2. `LUCKY_WHEEL_DATA_DIR` environment variable
//! 3. `data_dir` in the TOML config file
//! 4. OS-dependent default (fallback)

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{info, warn};

use crate::api::auth::AdminCredentials;
use crate::{Error, Result};

pub const DATA_DIR_ENV: &str = "LUCKY_WHEEL_DATA_DIR";
pub const CONFIG_ENV: &str = "LUCKY_WHEEL_CONFIG";

/// Admin credential file kept in the data folder: `{"username": .., "password": ..}`
pub const ADMIN_FILE: &str = "admin.json";

const APP_DIR_NAME: &str = "lucky-wheel";

/// Which persistence backend to open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Sqlite,
    Json,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sqlite" => Ok(StorageBackend::Sqlite),
            "json" => Ok(StorageBackend::Json),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(Error::Config(format!("unknown storage backend '{}'", other))),
        }
    }
}

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Folder holding the store files and `admin.json`
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Front-end assets to serve for non-API paths (optional)
    #[serde(default)]
    pub static_dir: Option<PathBuf>,

    #[serde(default)]
    pub storage: StorageConfig,

    /// Admin credential; falls back to `admin.json` in the data folder
    #[serde(default)]
    pub admin: Option<AdminCredentials>,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            data_dir: None,
            static_dir: None,
            storage: StorageConfig::default(),
            admin: None,
            session: SessionConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
}

/// Admin session settings
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Session lifetime measured from login (not sliding)
    #[serde(default = "default_ttl_minutes")]
    pub ttl_minutes: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_minutes: default_ttl_minutes(),
        }
    }
}

impl SessionConfig {
    /// Falls back to the default lifetime if `ttl_minutes` is out of range
    pub fn ttl(&self) -> Duration {
        Duration::try_minutes(self.ttl_minutes)
            .unwrap_or_else(|| Duration::minutes(default_ttl_minutes()))
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
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

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_ttl_minutes() -> i64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TomlConfig =
            toml::from_str(content).map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))?;
        if config.session.ttl_minutes <= 0 {
            return Err(Error::Config(format!(
                "session.ttl_minutes must be positive, got {}",
                config.session.ttl_minutes
            )));
        }
        if Duration::try_minutes(config.session.ttl_minutes).is_none() {
            return Err(Error::Config(format!(
                "session.ttl_minutes out of range: {}",
                config.session.ttl_minutes
            )));
        }
        Ok(config)
    }

    /// Load from `path`; a missing file yields the built-in defaults
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                info!("Loaded config file: {}", path.display());
                Self::from_toml_str(&content)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Config file not found at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(Error::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

/// Config file location: CLI argument, then environment, then platform default
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join("config.toml"))
}

/// Resolve the data folder following the priority order in the module docs
pub fn resolve_data_dir(cli_arg: Option<&Path>, config: &TomlConfig) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }
    if let Ok(path) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(path);
    }
    if let Some(path) = &config.data_dir {
        return path.clone();
    }
    default_data_dir()
}

/// OS-dependent default data folder
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from("./lucky_wheel_data"))
}

/// Admin credential from the TOML `[admin]` section, else from `admin.json`
///
/// Returns `None` when neither is present; admin login is then impossible.
pub fn load_admin_credentials(config: &TomlConfig, data_dir: &Path) -> Result<Option<AdminCredentials>> {
    if let Some(admin) = &config.admin {
        return Ok(Some(admin.clone()));
    }

    let path = data_dir.join(ADMIN_FILE);
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(Error::Config(format!("Failed to read {}: {}", path.display(), e)));
        }
    };

    #[derive(Deserialize)]
    struct AdminFile {
        username: Option<String>,
        password: Option<String>,
    }

    let file: AdminFile = serde_json::from_str(&content)
        .map_err(|e| Error::Config(format!("Invalid {}: {}", path.display(), e)))?;

    match (file.username, file.password) {
        (Some(username), Some(password)) => Ok(Some(AdminCredentials::new(username, password))),
        _ => {
            warn!("{} is missing username or password", path.display());
            Ok(None)
        }
    }
}
