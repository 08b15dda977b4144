//! Persistence backends behind the settings store.

mod file;
mod memory;

pub use file::FileBackend;
pub use memory::MemoryBackend;

use arc_common::SettingsError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;

/// One observed change to a stored key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageChange {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<Value>,
}

/// Key/value persistence with change notification.
#[async_trait]
pub trait PersistenceBackend: Send + Sync {
    async fn read(&self, key: &str) -> Result<Option<Value>, SettingsError>;

    async fn write(&self, key: &str, value: Value) -> Result<(), SettingsError>;

    /// Stream of changes, including ones caused by this process.
    fn subscribe(&self) -> broadcast::Receiver<StorageChange>;
}

pub(crate) const CHANGE_CAPACITY: usize = 32;
