//! Report output configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct ReportsConfig {
    /// Directory generated reports are written to and served from
    #[serde(default = "default_exports_dir")]
    pub exports_dir: PathBuf,
}

impl ReportsConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.exports_dir.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("reports.exports_dir"));
        }
        Ok(())
    }
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            exports_dir: default_exports_dir(),
        }
    }
}

fn default_exports_dir() -> PathBuf {
    PathBuf::from("reports/exports")
}
