use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where persisted settings live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Settings document path. Defaults to the platform data directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings_file: Option<PathBuf>,
    /// Pick up edits made by other processes.
    pub watch: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            settings_file: None,
            watch: true,
        }
    }
}
