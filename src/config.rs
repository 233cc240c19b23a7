//! Configuration management.
//!
//! All configuration is loaded from `./config/trendmap.toml`. No
//! hardcoded defaults exist in source code - all defaults are in the
//! embedded template, recreated with `trendmap --init`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Configuration file path relative to working directory.
pub const CONFIG_PATH: &str = "./config/trendmap.toml";

/// Default configuration file content - the ONLY place defaults exist.
pub const DEFAULT_CONFIG: &str = include_str!("../config/trendmap.toml");

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found at {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] io::Error),

    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Configuration field '{field}' is invalid: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub ingest: IngestConfig,
    pub output: OutputConfig,
}

/// HTTP client configuration for the content source.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub user_agent: String,
    pub request_timeout_secs: u64,
    /// Trending page URL; `{code}` is replaced per region.
    pub url_template: String,
}

/// Batch ingestion configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct IngestConfig {
    /// Regions fetched in parallel.
    pub concurrency: usize,
    /// Per-region budget; exceeding it records "no data" for the run.
    pub region_timeout_ms: u64,
    /// Mandatory delay after a slot is acquired, before the fetch.
    pub request_delay_ms: u64,
    /// Topics kept per region after ranking.
    pub top_n: usize,
    /// Topics scoring below this are dropped before persistence.
    pub score_floor: u8,
}

/// Output configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub store_path: PathBuf,
}

impl AppConfig {
    /// Load configuration from the default path.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path(Path::new(CONFIG_PATH))
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration values. Invalid configuration is
    /// fatal at startup, before any region processing begins.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.user_agent.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "http.user_agent".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.http.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "http.request_timeout_secs".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        if !self.http.url_template.contains("{code}") {
            return Err(ConfigError::InvalidValue {
                field: "http.url_template".to_string(),
                reason: "must contain the {code} placeholder".to_string(),
            });
        }
        if self.ingest.concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                field: "ingest.concurrency".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        if self.ingest.region_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "ingest.region_timeout_ms".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        if self.ingest.top_n == 0 {
            return Err(ConfigError::InvalidValue {
                field: "ingest.top_n".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        if self.ingest.score_floor > 100 {
            return Err(ConfigError::InvalidValue {
                field: "ingest.score_floor".to_string(),
                reason: "must be at most 100".to_string(),
            });
        }
        if self.output.store_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "output.store_path".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Create the default configuration file at the standard location.
    pub fn create_default_config() -> Result<PathBuf, ConfigError> {
        let path = Path::new(CONFIG_PATH);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, DEFAULT_CONFIG)?;
        Ok(path.to_path_buf())
    }
}
