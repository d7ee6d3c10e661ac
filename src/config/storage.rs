//! Configuration Storage Implementation
//!
//! JSON file-based configuration: a default file is written atomically
//! (temp file + rename) on first run, and environment overrides are applied
//! on load before validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::embeddings::ProviderConfig;
use crate::logging::LoggingConfig;
use crate::resolver::ResolutionConfig;
use crate::vector::SearchConfig;

/// Environment variable overriding the catalog file location
pub const CATALOG_PATH_ENV: &str = "CAMPUS_COMPASS_CATALOG";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid configuration: {reason}")]
    Invalid { reason: String },
}

/// Configuration result type
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration store settings
#[derive(Debug, Clone)]
pub struct ConfigStoreConfig {
    /// Path to the configuration file
    pub config_path: PathBuf,
    /// Whether to create default config if not exists
    pub create_default: bool,
    /// Whether environment variables may override file values
    pub apply_env: bool,
}

impl Default for ConfigStoreConfig {
    fn default() -> Self {
        let app_data = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("campus-compass");

        Self::at(app_data.join("config.json"))
    }
}

impl ConfigStoreConfig {
    /// Settings for a config file at `path`
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            create_default: true,
            apply_env: true,
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Configuration file format version
    pub version: u32,

    /// Catalog JSON document to serve from
    pub catalog_path: Option<PathBuf>,

    /// Hosted embedding and generation provider
    pub provider: ProviderConfig,

    /// Semantic search thresholds and index build settings
    pub search: SearchConfig,

    /// Intent confidences and score blending
    pub resolution: ResolutionConfig,

    pub logging: LoggingConfig,

    /// Last modification timestamp (RFC 3339)
    pub last_modified: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            catalog_path: None,
            provider: ProviderConfig::default(),
            search: SearchConfig::default(),
            resolution: ResolutionConfig::default(),
            logging: LoggingConfig::default(),
            last_modified: chrono::Utc::now().to_rfc3339(),
        }
    }
}

impl AppConfig {
    /// Check every section for values the engine cannot run with
    pub fn validate(&self) -> ConfigResult<()> {
        self.search.validate()?;
        self.resolution.validate()?;
        if self.provider.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                reason: "provider.base_url must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Apply environment overrides in place
    pub fn apply_env(&mut self) {
        if self.provider.apply_env() {
            debug!("Provider API key taken from environment");
        }
        if let Some(path) = std::env::var_os(CATALOG_PATH_ENV).filter(|p| !p.is_empty()) {
            debug!(path = ?path, "Catalog path taken from environment");
            self.catalog_path = Some(PathBuf::from(path));
        }
    }
}

/// Loaded, validated configuration together with where it came from
pub struct ConfigStore {
    config: AppConfig,
    settings: ConfigStoreConfig,
}

impl ConfigStore {
    /// Load the configuration, creating a default file when allowed
    pub async fn new(settings: ConfigStoreConfig) -> ConfigResult<Self> {
        let mut config = if settings.config_path.exists() {
            Self::load_from_file(&settings.config_path).await?
        } else if settings.create_default {
            if let Some(parent) = settings.config_path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            let default_config = AppConfig::default();
            Self::save_to_file(&settings.config_path, &default_config).await?;
            info!(path = ?settings.config_path, "Created default configuration");
            default_config
        } else {
            return Err(ConfigError::NotFound(settings.config_path.clone()));
        };

        if settings.apply_env {
            config.apply_env();
        }
        config.validate()?;

        Ok(Self { config, settings })
    }

    /// Load configuration from file
    async fn load_from_file(path: &Path) -> ConfigResult<AppConfig> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: AppConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file with atomic write
    async fn save_to_file(path: &Path, config: &AppConfig) -> ConfigResult<()> {
        let content = serde_json::to_string_pretty(config)?;

        let temp_path = path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, &content).await?;
        tokio::fs::rename(&temp_path, path).await?;

        Ok(())
    }

    /// Current configuration
    pub fn get(&self) -> &AppConfig {
        &self.config
    }

    /// Get configuration file path
    pub fn config_path(&self) -> &Path {
        &self.settings.config_path
    }
}
