//! Configuration management for Prospect.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides. The API key is the only durable
//! secret and lives in this file.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main application configuration.
///
/// This is loaded from `~/.config/prospect/config.toml` (or platform
/// equivalent). If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Upstream API settings
    pub api: ApiConfig,
    /// Batch capture settings
    pub batch: BatchConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            tracing::debug!("Loading config from {}", config_path.display());
            let contents = fs::read_to_string(&config_path)?;
            let config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `PROSPECT_API_KEY`: Override the stored API key
    /// - `PROSPECT_BASE_URL`: Override the upstream base URL
    /// - `PROSPECT_BATCH_DELAY_MS`: Override the inter-item batch delay
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;

        // Override from environment
        if let Ok(val) = std::env::var("PROSPECT_API_KEY") {
            if !val.trim().is_empty() {
                config.api.api_key = Some(val.trim().to_string());
                tracing::debug!("Override api_key from env");
            }
        }

        if let Ok(val) = std::env::var("PROSPECT_BASE_URL") {
            if !val.trim().is_empty() {
                config.api.base_url = val.trim().to_string();
                tracing::debug!("Override base_url from env: {}", config.api.base_url);
            }
        }

        if let Ok(val) = std::env::var("PROSPECT_BATCH_DELAY_MS") {
            if let Ok(ms) = val.parse() {
                config.batch.delay_between_items_ms = ms;
                tracing::debug!("Override delay_between_items_ms from env: {}", ms);
            }
        }

        Ok(config)
    }

    /// Save configuration to disk.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> ConfigResult<()> {
        let config_path = Self::config_path()?;
        let config_dir = config_path
            .parent()
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "config_path".to_string(),
                reason: "no parent directory".to_string(),
            })?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving config to {}", config_path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(config_path, contents)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/prospect/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("com", "prospect", "prospect").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Upstream API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the upstream prospecting API
    pub base_url: String,
    /// API key (also settable via `PROSPECT_API_KEY`)
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.apollo.io/api/v1".to_string(),
            api_key: None,
            timeout_secs: 30,
            user_agent: "Prospect/0.1.0 (+https://github.com/prospect-tools/prospect)".to_string(),
        }
    }
}

/// Batch capture settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Delay between batch items in milliseconds (client-side rate limiting)
    pub delay_between_items_ms: u64,
    /// Per-item timeout in seconds
    pub item_timeout_secs: u64,
    /// Per-strategy timeout in seconds for the contact resolver
    pub strategy_timeout_secs: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            delay_between_items_ms: 2000,
            item_timeout_secs: 45,
            strategy_timeout_secs: 30,
        }
    }
}
