//! Persisted user settings: types, default-fill, backends and the
//! process-wide store.

pub mod backend;
mod store;
mod types;

pub use backend::{FileBackend, MemoryBackend, PersistenceBackend, StorageChange};
pub use store::SettingsStore;
pub use types::{Settings, SettingsDefaults, STORAGE_KEY};
