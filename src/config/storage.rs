//! Conversation state storage configuration

use serde::Deserialize;
use std::path::PathBuf;

/// Where conversation state is kept between requests
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
    /// Directory for YAML state files. Unset keeps state in memory.
    pub state_dir: Option<PathBuf>,
}

impl StorageConfig {
    pub fn is_persistent(&self) -> bool {
        self.state_dir
            .as_ref()
            .is_some_and(|dir| !dir.as_os_str().is_empty())
    }
}
