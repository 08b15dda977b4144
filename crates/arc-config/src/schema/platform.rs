use serde::{Deserialize, Serialize};

/// Host platform selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Force `mac`, `windows` or `linux` instead of detecting.
    #[serde(rename = "override", skip_serializing_if = "Option::is_none")]
    pub override_platform: Option<String>,
}

pub const KNOWN_PLATFORMS: &[&str] = &["mac", "windows", "linux"];
