//! Host application configuration.
//!
//! # Responsibility
//! - Identify the host application that owns the export store.
//! - Derive where the store lives from that identity.
//!
//! # Invariants
//! - `app_id` is a reverse-DNS style identifier (`com.example.app`).
//! - `data_dir = None` selects an in-memory store.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

static APP_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9_-]*(\.[A-Za-z0-9_-]+)*$").expect("valid app id regex")
});

const STORE_FILE_SUFFIX: &str = "exportkit.sqlite3";

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    InvalidAppId(String),
    /// `data_dir` must be absolute when set.
    RelativeDataDir(PathBuf),
    Parse(serde_json::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidAppId(value) => write!(f, "invalid app id: `{value}`"),
            Self::RelativeDataDir(path) => {
                write!(f, "data_dir must be an absolute path, got `{}`", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

/// Where the record store is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    InMemory,
    File(PathBuf),
}

/// Static record identifying the host application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportKitConfig {
    pub app_id: String,
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl ExportKitConfig {
    /// Config for an in-memory store.
    pub fn in_memory(app_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            data_dir: None,
        }
    }

    /// Config for a file store under `data_dir`.
    pub fn with_data_dir(app_id: impl Into<String>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            app_id: app_id.into(),
            data_dir: Some(data_dir.into()),
        }
    }

    /// Parses and validates a JSON config document.
    pub fn from_json_str(value: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(value).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !APP_ID_RE.is_match(self.app_id.as_str()) {
            return Err(ConfigError::InvalidAppId(self.app_id.clone()));
        }
        if let Some(dir) = &self.data_dir {
            if !dir.is_absolute() {
                return Err(ConfigError::RelativeDataDir(dir.clone()));
            }
        }
        Ok(())
    }

    /// Resolves the store location: `<data_dir>/<app_id>.exportkit.sqlite3`.
    pub fn store_location(&self) -> StoreLocation {
        match &self.data_dir {
            None => StoreLocation::InMemory,
            Some(dir) => {
                StoreLocation::File(dir.join(format!("{}.{STORE_FILE_SUFFIX}", self.app_id)))
            }
        }
    }
}
