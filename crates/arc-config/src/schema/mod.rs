//! Configuration schema types for Arc Command.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod bridge;
mod logging;
mod overlay;
mod platform;
mod storage;
mod zoom;

pub use bridge::*;
pub use logging::*;
pub use overlay::*;
pub use platform::*;
pub use storage::*;
pub use zoom::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcConfig {
    pub bridge: BridgeConfig,
    pub platform: PlatformConfig,
    pub storage: StorageConfig,
    pub overlay: OverlayConfig,
    pub zoom: ZoomConfig,
    pub logging: LoggingConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_bridge_contract() {
        let config = ArcConfig::default();
        assert_eq!(config.bridge.request_timeout_ms, 5000);
        assert_eq!(config.bridge.ready_timeout_ms, 5000);
        assert!(config.storage.watch);
        assert!(config.platform.override_platform.is_none());
    }

    #[test]
    fn zoom_defaults() {
        let zoom = ZoomConfig::default();
        assert_eq!(zoom.step, 0.1);
        assert_eq!(zoom.min, 0.25);
        assert_eq!(zoom.max, 5.0);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config: ArcConfig = toml::from_str(
            r#"
[bridge]
request_timeout_ms = 250
"#,
        )
        .unwrap();
        assert_eq!(config.bridge.request_timeout_ms, 250);
        assert_eq!(config.bridge.ready_timeout_ms, 5000);
        assert_eq!(config.overlay, OverlayConfig::default());
    }

    #[test]
    fn platform_override_uses_override_key() {
        let config: ArcConfig = toml::from_str(
            r#"
[platform]
override = "mac"
"#,
        )
        .unwrap();
        assert_eq!(config.platform.override_platform.as_deref(), Some("mac"));
    }
}
