//! Arc Command configuration and settings.
//!
//! Two layers live here: the TOML `config.toml` describing how the tool
//! runs, and the persisted user [`Settings`] (arc mode and per-shortcut
//! enablement) behind a [`SettingsStore`].

pub mod schema;
pub mod settings;
pub mod toml_loader;
pub mod validation;
pub mod watcher;

pub use schema::{ArcConfig, CONFIG_SCHEMA_VERSION};
pub use settings::{
    FileBackend, MemoryBackend, PersistenceBackend, Settings, SettingsDefaults, SettingsStore,
    StorageChange, STORAGE_KEY,
};
pub use watcher::FileWatcher;

use arc_common::ConfigError;
use std::path::PathBuf;

/// Load config from the platform default path and validate it.
pub fn load_config() -> Result<ArcConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Resolved settings document location for a config.
pub fn settings_path(config: &ArcConfig) -> Result<PathBuf, ConfigError> {
    match config.storage.settings_file {
        Some(ref path) => Ok(path.clone()),
        None => toml_loader::default_settings_path(),
    }
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &ArcConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_to_json_contains_all_sections() {
        let json = config_to_json(&ArcConfig::default());
        for section in ["bridge", "platform", "storage", "overlay", "zoom", "logging"] {
            assert!(json.contains(&format!("\"{section}\"")), "missing {section}");
        }
    }

    #[test]
    fn explicit_settings_file_wins() {
        let mut config = ArcConfig::default();
        config.storage.settings_file = Some(PathBuf::from("/tmp/arc.json"));
        assert_eq!(settings_path(&config).unwrap(), PathBuf::from("/tmp/arc.json"));
    }

    #[test]
    fn config_schema_version_is_1() {
        assert_eq!(CONFIG_SCHEMA_VERSION, 1);
    }
}
