//! Bootstrap configuration
//!
//! Settings are resolved per key in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`CAFE_DATABASE_PATH`, `CAFE_HOST`, `CAFE_PORT`)
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing default config file is not an error; the service starts on
//! defaults and logs a warning. A config file named explicitly must exist.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const ENV_DATABASE_PATH: &str = "CAFE_DATABASE_PATH";
pub const ENV_HOST: &str = "CAFE_HOST";
pub const ENV_PORT: &str = "CAFE_PORT";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5740;

/// Contents of the TOML config file; every key optional
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TomlConfig {
    /// Path to SQLite database file
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    #[serde(default)]
    pub host: Option<String>,

    #[serde(default)]
    pub port: Option<u16>,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub retry: RetryConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error); `RUST_LOG` wins if set
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

/// Optimistic-update retry budget for cafe aggregates
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_lock_wait_ms")]
    pub max_lock_wait_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_lock_wait_ms: default_max_lock_wait_ms(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_lock_wait_ms() -> u64 {
    2000
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_file: Option<PathBuf>,
    pub database_path: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub database_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub max_lock_wait_ms: u64,
}

impl ServiceConfig {
    /// Resolve configuration from all sources
    pub fn resolve(overrides: &ConfigOverrides) -> Result<Self> {
        let toml_config = match &overrides.config_file {
            Some(path) => load_toml_config(path)?,
            None => match default_config_path().filter(|p| p.exists()) {
                Some(path) => load_toml_config(&path)?,
                None => {
                    warn!("No config file found, using defaults");
                    TomlConfig::default()
                }
            },
        };

        Self::from_sources(overrides, &toml_config)
    }

    /// Merge overrides, environment and an already-loaded TOML config
    pub fn from_sources(overrides: &ConfigOverrides, toml_config: &TomlConfig) -> Result<Self> {
        let database_path = overrides
            .database_path
            .clone()
            .or_else(|| std::env::var(ENV_DATABASE_PATH).ok().map(PathBuf::from))
            .or_else(|| toml_config.database_path.clone())
            .unwrap_or_else(default_database_path);

        let host = overrides
            .host
            .clone()
            .or_else(|| std::env::var(ENV_HOST).ok())
            .or_else(|| toml_config.host.clone())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match (overrides.port, std::env::var(ENV_PORT).ok()) {
            (Some(port), _) => port,
            (None, Some(raw)) => raw
                .parse()
                .map_err(|_| Error::Config(format!("{} is not a valid port: {:?}", ENV_PORT, raw)))?,
            (None, None) => toml_config.port.unwrap_or(DEFAULT_PORT),
        };

        Ok(Self {
            database_path,
            host,
            port,
            log_level: toml_config.logging.level.clone(),
            max_lock_wait_ms: toml_config.retry.max_lock_wait_ms,
        })
    }

    /// `host:port` for binding the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Read and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    let config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;
    info!("Loaded config file: {}", path.display());
    Ok(config)
}

/// Platform config file location (`~/.config/cafe/config.toml` on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("cafe").join("config.toml"))
}

/// Platform database location
pub fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("cafe"))
        .unwrap_or_else(|| PathBuf::from("./cafe_data"))
        .join("cafe.db")
}
