//! Classifier artifact configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Where the classifier package lives
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Path to the JSON model package
    #[serde(default = "default_model_path")]
    pub path: PathBuf,

    /// Load the model at startup instead of on the first prediction
    #[serde(default)]
    pub preload: bool,
}

impl ModelConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.path.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("model.path"));
        }
        Ok(())
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
            preload: false,
        }
    }
}

fn default_model_path() -> PathBuf {
    PathBuf::from("ai_engine/genetic_disorder_model.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_config_defaults() {
        let config = ModelConfig::default();
        assert_eq!(config.path, PathBuf::from("ai_engine/genetic_disorder_model.json"));
        assert!(!config.preload);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_model_path_is_rejected() {
        let config = ModelConfig {
            path: PathBuf::new(),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("model.path"))
        );
    }
}
