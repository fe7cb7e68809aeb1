//! Serializable run configuration.
//!
//! One TOML file describes a deployment: where the catalog lives, where the
//! cursor is stored, which years to fetch from which endpoint, and where
//! results go. The config file is the single source of truth for a run.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub catalog: CatalogConfig,
    pub cursor: CursorConfig,
    pub fetch: FetchConfig,
    pub storage: StorageConfig,
    pub sheet: SheetConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// CSV file with `code`, `name`, `category` columns, in sweep order.
    pub path: PathBuf,

    /// Category allow-list; empty keeps every row.
    #[serde(default)]
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CursorConfig {
    pub path: PathBuf,

    /// Cursor time-to-live in seconds.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Quote service endpoint (form POST of `code` and `year`).
    pub endpoint: String,

    /// Years to fetch, newest first.
    pub years: Vec<u16>,

    /// HTTP client timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub dir: PathBuf,

    /// Upload the raw concatenated series to storage on each run.
    #[serde(default)]
    pub upload_raw: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetConfig {
    pub path: PathBuf,
}

fn default_ttl_secs() -> u64 {
    30 * 60
}

fn default_timeout_secs() -> u64 {
    30
}

impl RunConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.fetch.years.is_empty() {
            return Err(ConfigError::Invalid("fetch.years must not be empty".into()));
        }
        if self.fetch.years.windows(2).any(|pair| pair[0] <= pair[1]) {
            return Err(ConfigError::Invalid(
                "fetch.years must be strictly descending".into(),
            ));
        }
        if self.cursor.ttl_secs == 0 {
            return Err(ConfigError::Invalid("cursor.ttl_secs must be positive".into()));
        }
        Ok(())
    }

    /// Cursor TTL as a chrono duration.
    pub fn cursor_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.cursor.ttl_secs as i64)
    }

    /// HTTP timeout as a std duration.
    pub fn fetch_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.fetch.timeout_secs)
    }
}
