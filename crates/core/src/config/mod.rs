//! Application configuration with layered loading.
//!
//! Sources, lowest to highest precedence:
//!
//! 1. Built-in defaults
//! 2. TOML config file (if BINP_CONFIG_FILE set)
//! 3. Environment variables (BINP_*)

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the SQLite snippet database.
    ///
    /// Set via BINP_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Number of snippets kept in the in-memory LRU cache.
    ///
    /// Set via BINP_CACHE_CAPACITY environment variable.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    /// Seconds between expiration sweeps.
    ///
    /// Set via BINP_SWEEP_INTERVAL_SECS environment variable.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,

    /// Deadline for a single durable store call, in milliseconds.
    ///
    /// Set via BINP_STORE_TIMEOUT_MS environment variable.
    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,

    /// Length of generated snippet identifiers.
    ///
    /// Set via BINP_ID_LENGTH environment variable.
    #[serde(default = "default_id_length")]
    pub id_length: usize,

    /// How many fresh identifiers a create tries before giving up.
    ///
    /// Set via BINP_ID_MAX_ATTEMPTS environment variable.
    #[serde(default = "default_id_max_attempts")]
    pub id_max_attempts: u32,

    /// Largest snippet body accepted by the tool and CLI surfaces.
    ///
    /// Set via BINP_MAX_TEXT_BYTES environment variable.
    #[serde(default = "default_max_text_bytes")]
    pub max_text_bytes: usize,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./binp.sqlite")
}

fn default_cache_capacity() -> usize {
    100
}

fn default_sweep_interval_secs() -> u64 {
    3_600
}

fn default_store_timeout_ms() -> u64 {
    5_000
}

fn default_id_length() -> usize {
    crate::ids::DEFAULT_ID_LENGTH
}

fn default_id_max_attempts() -> u32 {
    3
}

fn default_max_text_bytes() -> usize {
    10_000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            cache_capacity: default_cache_capacity(),
            sweep_interval_secs: default_sweep_interval_secs(),
            store_timeout_ms: default_store_timeout_ms(),
            id_length: default_id_length(),
            id_max_attempts: default_id_max_attempts(),
            max_text_bytes: default_max_text_bytes(),
        }
    }
}

impl AppConfig {
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Cache capacity, clamped to at least one entry.
    pub fn cache_capacity(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.cache_capacity).unwrap_or(NonZeroUsize::MIN)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("BINP_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("BINP_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        Self::extract(figment)
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
