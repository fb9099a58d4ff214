//! Configuration loading and saving utilities.
//!
//! `config.json` holds the deployment mode and optional endpoint overrides.
//! A missing or corrupt file yields defaults; environment variables win over
//! the file.

use std::env;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, ShortlistError};
use crate::storage::StorageConfig;

pub const MODE_ENV: &str = "SHORTLIST_MODE";
pub const API_URL_ENV: &str = "SHORTLIST_API_URL";
pub const APP_URL_ENV: &str = "SHORTLIST_APP_URL";

const PRODUCTION_APP_URL: &str = "https://shortlist.app";
const PRODUCTION_API_URL: &str = "https://api.shortlist.app";
const DEVELOPMENT_APP_URL: &str = "http://localhost:3000";
const DEVELOPMENT_API_URL: &str = "http://localhost:8787";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Production,
    Development,
}

impl Mode {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Some(Mode::Production),
            "development" | "dev" => Some(Mode::Development),
            _ => None,
        }
    }
}

/// Whether reactivating a tombstone is subject to the capacity limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactivationPolicy {
    /// Reactivation never counts against capacity.
    #[default]
    Exempt,
    /// Reactivation fails with `CapacityExceeded` when the list is full.
    Enforce,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShortlistConfig {
    pub mode: Mode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_base_url: Option<String>,
    /// No timeout unless set; a hung endpoint otherwise stalls the caller.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    pub reactivation: ReactivationPolicy,
}

impl ShortlistConfig {
    /// Base URL of the comparison service API, without a trailing slash.
    pub fn api_base_url(&self) -> String {
        let url = self.api_base_url.as_deref().unwrap_or(match self.mode {
            Mode::Production => PRODUCTION_API_URL,
            Mode::Development => DEVELOPMENT_API_URL,
        });
        url.trim_end_matches('/').to_string()
    }

    /// Base URL of the web app that renders comparisons.
    pub fn app_base_url(&self) -> String {
        let url = self.app_base_url.as_deref().unwrap_or(match self.mode {
            Mode::Production => PRODUCTION_APP_URL,
            Mode::Development => DEVELOPMENT_APP_URL,
        });
        url.trim_end_matches('/').to_string()
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Applies `SHORTLIST_*` environment overrides on top of file values.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(value) = env::var(MODE_ENV) {
            match Mode::parse(&value) {
                Some(mode) => self.mode = mode,
                None => warn!(value = %value, "Ignoring unknown {}", MODE_ENV),
            }
        }
        if let Some(url) = non_empty_env(API_URL_ENV) {
            self.api_base_url = Some(url);
        }
        if let Some(url) = non_empty_env(APP_URL_ENV) {
            self.app_base_url = Some(url);
        }
        self
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Loads the configuration, returning defaults if the file is missing or corrupt.
pub fn load_config_with_storage(storage: &StorageConfig) -> ShortlistConfig {
    let path = storage.config_file();
    let config = match load_config_strict(&path) {
        Ok(config) => config,
        Err(err) => {
            warn!(error = %err, "Using default configuration");
            ShortlistConfig::default()
        }
    };
    config.with_env_overrides()
}

/// Loads the configuration file, failing on malformed content.
/// A missing file is not an error.
pub fn load_config_strict(path: &Path) -> Result<ShortlistConfig> {
    let content = match fs_err::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(ShortlistConfig::default())
        }
        Err(err) => return Err(ShortlistError::store("read config", err)),
    };
    if content.trim().is_empty() {
        return Ok(ShortlistConfig::default());
    }
    serde_json::from_str(&content).map_err(|e| ShortlistError::ConfigMalformed {
        path: path.to_path_buf(),
        details: e.to_string(),
    })
}

/// Saves the configuration to disk.
pub fn save_config_with_storage(storage: &StorageConfig, config: &ShortlistConfig) -> Result<()> {
    let path = storage.config_file();
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent).map_err(|e| ShortlistError::store("create config dir", e))?;
    }
    let content = serde_json::to_string_pretty(config).map_err(|source| {
        ShortlistError::StoreEncoding {
            context: "serialize config".to_string(),
            source,
        }
    })?;
    fs_err::write(&path, content).map_err(|e| ShortlistError::store("write config", e))
}
