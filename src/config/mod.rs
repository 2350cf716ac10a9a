//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `GENEACCESS` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use geneaccess::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Model expected at {}", config.model.path.display());
//! ```

mod error;
mod model;
mod reports;
mod server;
mod storage;

pub use error::{ConfigError, ValidationError};
pub use model::ModelConfig;
pub use reports::ReportsConfig;
pub use server::{Environment, LogFormat, ServerConfig};
pub use storage::StorageConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a runnable
/// development setup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Listener, logging and CORS
    #[serde(default)]
    pub server: ServerConfig,

    /// Classifier artifact location
    #[serde(default)]
    pub model: ModelConfig,

    /// Report exports directory
    #[serde(default)]
    pub reports: ReportsConfig,

    /// Conversation state storage
    #[serde(default)]
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `GENEACCESS` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `GENEACCESS__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `GENEACCESS__MODEL__PATH=...` -> `model.path = ...`
    /// - `GENEACCESS__STORAGE__STATE_DIR=...` -> `storage.state_dir = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("GENEACCESS")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.model.validate()?;
        self.reports.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::path::PathBuf;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: [&str; 7] = [
        "GENEACCESS__SERVER__PORT",
        "GENEACCESS__SERVER__ENVIRONMENT",
        "GENEACCESS__SERVER__LOG_FORMAT",
        "GENEACCESS__MODEL__PATH",
        "GENEACCESS__MODEL__PRELOAD",
        "GENEACCESS__REPORTS__EXPORTS_DIR",
        "GENEACCESS__STORAGE__STATE_DIR",
    ];

    /// Helper to clear environment variables after testing
    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_defaults_from_empty_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.model.path, PathBuf::from("ai_engine/genetic_disorder_model.json"));
        assert_eq!(config.reports.exports_dir, PathBuf::from("reports/exports"));
        assert!(!config.storage.is_persistent());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("GENEACCESS__SERVER__PORT", "3000");
        env::set_var("GENEACCESS__MODEL__PATH", "/models/genetic.json");
        env::set_var("GENEACCESS__REPORTS__EXPORTS_DIR", "/var/reports");
        env::set_var("GENEACCESS__STORAGE__STATE_DIR", "/var/sessions");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.model.path, PathBuf::from("/models/genetic.json"));
        assert_eq!(config.reports.exports_dir, PathBuf::from("/var/reports"));
        assert_eq!(config.storage.state_dir, Some(PathBuf::from("/var/sessions")));
    }

    #[test]
    fn test_is_production() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("GENEACCESS__SERVER__ENVIRONMENT", "production");
        env::set_var("GENEACCESS__SERVER__LOG_FORMAT", "json");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
        assert_eq!(config.server.log_format, LogFormat::Json);
    }

    #[test]
    fn test_validate_rejects_bad_server() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert_eq!(config.validate(), Err(ValidationError::InvalidPort));
    }
}
