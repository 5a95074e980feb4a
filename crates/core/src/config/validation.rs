//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `update_interval_ms` is below 100ms or above one minute
    /// - `refresh_duration_ms` is shorter than the update interval or longer than a day
    /// - `max_loose_domains` is 0 or above 10000
    /// - `history_timeout_ms` is below 100ms or above 5 minutes
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.update_interval_ms < 100 {
            return Err(ConfigError::Invalid {
                field: "update_interval_ms".into(),
                reason: "must be at least 100ms".into(),
            });
        }
        if self.update_interval_ms > 60_000 {
            return Err(ConfigError::Invalid {
                field: "update_interval_ms".into(),
                reason: "must not exceed 1 minute (60000ms)".into(),
            });
        }

        if self.refresh_duration_ms < self.update_interval_ms {
            return Err(ConfigError::Invalid {
                field: "refresh_duration_ms".into(),
                reason: "must not be shorter than update_interval_ms".into(),
            });
        }
        if self.refresh_duration_ms > 86_400_000 {
            return Err(ConfigError::Invalid {
                field: "refresh_duration_ms".into(),
                reason: "must not exceed 1 day (86400000ms)".into(),
            });
        }

        if self.max_loose_domains == 0 || self.max_loose_domains > 10_000 {
            return Err(ConfigError::Invalid {
                field: "max_loose_domains".into(),
                reason: "must be between 1 and 10000".into(),
            });
        }

        if self.history_timeout_ms < 100 {
            return Err(ConfigError::Invalid {
                field: "history_timeout_ms".into(),
                reason: "must be at least 100ms".into(),
            });
        }
        if self.history_timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "history_timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.history_path.is_none() {
            tracing::warn!("history_path is not set; visited items will stay empty");
        }

        Ok(())
    }
}
