//! YAML configuration file support.
//!
//! A single file describes the matching run and where its inputs and
//! outputs live. Every section is optional; missing values fall back to
//! the defaults below, and command-line flags override whatever the file
//! says.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! log_level: "info"
//!
//! matcher:
//!   policy: "tight"
//!   max_candidates: 2
//!   dedupe: true
//!   use_index: true
//!   traversal: "product_major"
//!   parallel: false
//!
//! paths:
//!   products: "data/products.txt"
//!   listings: "data/listings.txt"
//!   results: "results.txt"
//!   viewer_dir: "viewer"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use matcher::{MatchConfig, MatchError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

impl From<MatchError> for ConfigLoadError {
    fn from(err: MatchError) -> Self {
        ConfigLoadError::Validation(err.to_string())
    }
}

/// Top-level configuration of a `listmatch` run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct ListmatchConfig {
    /// Configuration format version
    #[serde(default = "default_version")]
    pub version: String,

    /// Default `tracing` filter directive; `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub matcher: MatchConfig,

    #[serde(default)]
    pub paths: PathsConfig,
}

impl ListmatchConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: ListmatchConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;
        if self.log_level.trim().is_empty() {
            return Err(ConfigLoadError::Validation(
                "log_level must not be empty".to_string(),
            ));
        }
        self.matcher.validate()?;
        self.paths.validate()
    }
}

impl Default for ListmatchConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            log_level: default_log_level(),
            matcher: MatchConfig::default(),
            paths: PathsConfig::default(),
        }
    }
}

/// Input and output locations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PathsConfig {
    #[serde(default = "default_products")]
    pub products: PathBuf,

    #[serde(default = "default_listings")]
    pub listings: PathBuf,

    #[serde(default = "default_results")]
    pub results: PathBuf,

    /// Directory receiving `listings.html` and `js/data.js` when set.
    #[serde(default)]
    pub viewer_dir: Option<PathBuf>,

    /// Standalone `data.js` output.
    #[serde(default)]
    pub data_js: Option<PathBuf>,
}

impl PathsConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        for (name, path) in [
            ("paths.products", &self.products),
            ("paths.listings", &self.listings),
            ("paths.results", &self.results),
        ] {
            if path.as_os_str().is_empty() {
                return Err(ConfigLoadError::Validation(format!(
                    "{name} must not be empty"
                )));
            }
        }
        Ok(())
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            products: default_products(),
            listings: default_listings(),
            results: default_results(),
            viewer_dir: None,
            data_js: None,
        }
    }
}

fn default_version() -> String {
    "1.0".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_products() -> PathBuf {
    PathBuf::from("products.txt")
}
fn default_listings() -> PathBuf {
    PathBuf::from("listings.txt")
}
fn default_results() -> PathBuf {
    PathBuf::from("results.txt")
}
