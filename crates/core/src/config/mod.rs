//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (REVISIT_*)
//! 2. TOML config file (if REVISIT_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::policy::MAX_LOOSE_DOMAINS;

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (REVISIT_*)
/// 2. TOML config file (if REVISIT_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to a Chromium-format `History` database.
    ///
    /// Set via REVISIT_HISTORY_PATH environment variable.
    /// Without it the host serves an empty history.
    #[serde(default)]
    pub history_path: Option<PathBuf>,

    /// Path to the SQLite database holding persisted settings.
    ///
    /// Set via REVISIT_DB_PATH environment variable.
    /// Without it settings live in memory for the lifetime of the process.
    #[serde(default)]
    pub db_path: Option<PathBuf>,

    /// Reconciliation tick in milliseconds.
    ///
    /// Set via REVISIT_UPDATE_INTERVAL_MS environment variable.
    #[serde(default = "default_update_interval_ms")]
    pub update_interval_ms: u64,

    /// Trailing history window re-read on each incremental reconciliation.
    ///
    /// Set via REVISIT_REFRESH_DURATION_MS environment variable.
    #[serde(default = "default_refresh_duration_ms")]
    pub refresh_duration_ms: u64,

    /// Number of loose-mode domains remembered.
    ///
    /// Set via REVISIT_MAX_LOOSE_DOMAINS environment variable.
    #[serde(default = "default_max_loose_domains")]
    pub max_loose_domains: usize,

    /// Upper bound on a single history search in milliseconds.
    ///
    /// Set via REVISIT_HISTORY_TIMEOUT_MS environment variable.
    #[serde(default = "default_history_timeout_ms")]
    pub history_timeout_ms: u64,
}

fn default_update_interval_ms() -> u64 {
    1_000
}

fn default_refresh_duration_ms() -> u64 {
    5 * 60 * 1_000
}

fn default_max_loose_domains() -> usize {
    MAX_LOOSE_DOMAINS
}

fn default_history_timeout_ms() -> u64 {
    10_000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            history_path: None,
            db_path: None,
            update_interval_ms: default_update_interval_ms(),
            refresh_duration_ms: default_refresh_duration_ms(),
            max_loose_domains: default_max_loose_domains(),
            history_timeout_ms: default_history_timeout_ms(),
        }
    }
}

impl AppConfig {
    pub fn update_interval(&self) -> Duration {
        Duration::from_millis(self.update_interval_ms)
    }

    pub fn refresh_duration(&self) -> Duration {
        Duration::from_millis(self.refresh_duration_ms)
    }

    pub fn history_timeout(&self) -> Duration {
        Duration::from_millis(self.history_timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `REVISIT_`
    /// 2. TOML file from `REVISIT_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("REVISIT_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("REVISIT_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        Self::from_figment(figment)
    }

    /// Extract and validate a configuration from an assembled figment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::LoadFailed` if extraction fails, or the
    /// validation error otherwise.
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.history_path.is_none());
        assert!(config.db_path.is_none());
        assert_eq!(config.update_interval_ms, 1_000);
        assert_eq!(config.refresh_duration_ms, 300_000);
        assert_eq!(config.max_loose_domains, 100);
        assert_eq!(config.history_timeout_ms, 10_000);
    }

    #[test]
    fn test_durations() {
        let config = AppConfig::default();
        assert_eq!(config.update_interval(), Duration::from_secs(1));
        assert_eq!(config.refresh_duration(), Duration::from_secs(300));
        assert_eq!(config.history_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_toml_layer_overrides_defaults() {
        let figment = Figment::from(Serialized::defaults(AppConfig::default())).merge(Toml::string(
            r#"
            history_path = "/tmp/History"
            max_loose_domains = 20
            "#,
        ));

        let config = AppConfig::from_figment(figment).unwrap();
        assert_eq!(config.history_path, Some(PathBuf::from("/tmp/History")));
        assert_eq!(config.max_loose_domains, 20);
        assert_eq!(config.update_interval_ms, 1_000);
    }

    #[test]
    fn test_invalid_layer_fails_validation() {
        let figment =
            Figment::from(Serialized::defaults(AppConfig::default())).merge(Toml::string("update_interval_ms = 5"));

        let result = AppConfig::from_figment(figment);
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "update_interval_ms"));
    }

    #[test]
    fn test_wrong_type_fails_to_load() {
        let figment = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::string("max_loose_domains = \"lots\""));

        assert!(matches!(AppConfig::from_figment(figment), Err(ConfigError::LoadFailed(_))));
    }
}
