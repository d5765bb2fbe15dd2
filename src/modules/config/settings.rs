use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::{DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_MIN_PASSWORD_LENGTH, PHONE_LENGTH, PHONE_PREFIX};

/// Errors raised while reading a configuration file
#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Parse(serde_json::Error),
}

impl From<io::Error> for ConfigError {
    fn from(error: io::Error) -> Self {
        ConfigError::Io(error)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(error: serde_json::Error) -> Self {
        ConfigError::Parse(error)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Cannot read configuration: {}", e),
            ConfigError::Parse(e) => write!(f, "Invalid configuration: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Format rules applied to identifiers and passwords
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PolicyConfig {
    /// `None` turns the length gate off (older form variant)
    pub min_password_length: Option<usize>,
    pub phone_prefix: String,
    pub phone_length: usize,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            min_password_length: Some(DEFAULT_MIN_PASSWORD_LENGTH),
            phone_prefix: PHONE_PREFIX.to_string(),
            phone_length: PHONE_LENGTH,
        }
    }
}

/// Upload limits and deletion behaviour of the gallery
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GalleryConfig {
    pub max_upload_bytes: Option<u64>,
    pub confirm_deletions: bool,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: Some(DEFAULT_MAX_UPLOAD_BYTES),
            confirm_deletions: true,
        }
    }
}

/// Top level configuration for the application
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub policy: PolicyConfig,
    pub gallery: GalleryConfig,
    pub log_file: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from a JSON file; missing keys take their defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path)?;
        let config = serde_json::from_str(&data)?;
        Ok(config)
    }

    /// Load the given file, or fall back to defaults when no path was supplied
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
