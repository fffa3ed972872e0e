//! Configuration validation rules.
//!
//! Checks `AppConfig` values after they have been loaded from environment,
//! files, or defaults.

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

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `cache_capacity` is 0 or above 1,000,000
    /// - `sweep_interval_secs` is 0
    /// - `store_timeout_ms` is below 100ms or above 5 minutes
    /// - `id_length` is outside 8..=64
    /// - `id_max_attempts` is outside 1..=16
    /// - `max_text_bytes` is 0
    /// - `db_path` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_capacity == 0 {
            return Err(invalid("cache_capacity", "must be greater than 0"));
        }
        if self.cache_capacity > 1_000_000 {
            return Err(invalid("cache_capacity", "must not exceed 1000000"));
        }

        if self.sweep_interval_secs == 0 {
            return Err(invalid("sweep_interval_secs", "must be greater than 0"));
        }

        if self.store_timeout_ms < 100 {
            return Err(invalid("store_timeout_ms", "must be at least 100ms"));
        }
        if self.store_timeout_ms > 300_000 {
            return Err(invalid("store_timeout_ms", "must not exceed 5 minutes (300000ms)"));
        }

        if !(8..=64).contains(&self.id_length) {
            return Err(invalid("id_length", "must be between 8 and 64"));
        }

        if !(1..=16).contains(&self.id_max_attempts) {
            return Err(invalid("id_max_attempts", "must be between 1 and 16"));
        }

        if self.max_text_bytes == 0 {
            return Err(invalid("max_text_bytes", "must be greater than 0"));
        }

        if self.db_path.as_os_str().is_empty() {
            return Err(invalid("db_path", "must not be empty"));
        }

        if self.id_length < 12 {
            tracing::warn!(
                id_length = self.id_length,
                "short snippet identifiers are guessable; burn-after-read snippets may be read by others"
            );
        }

        Ok(())
    }
}
