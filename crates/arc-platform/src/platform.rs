use std::fmt;
use std::sync::LazyLock;

use arc_common::PlatformError;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Host operating system family, as far as shortcut tables care.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Mac,
    Windows,
    Linux,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Mac, Platform::Windows, Platform::Linux];

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Mac => "mac",
            Platform::Windows => "windows",
            Platform::Linux => "linux",
        }
    }

    /// Parse an exact platform name (`mac`, `windows`, `linux`).
    pub fn from_name(name: &str) -> Result<Self, PlatformError> {
        match name.trim().to_lowercase().as_str() {
            "mac" => Ok(Platform::Mac),
            "windows" => Ok(Platform::Windows),
            "linux" => Ok(Platform::Linux),
            other => Err(PlatformError::UnknownPlatform(other.to_string())),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static MAC_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)mac").unwrap());
static WIN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)win").unwrap());

/// Classify a free-form platform identification string such as
/// `"MacIntel"`, `"Win32"` or `"Linux x86_64"`. Anything that is neither
/// mac nor windows is linux.
pub fn detect_platform(ident: &str) -> Platform {
    if MAC_RE.is_match(ident) {
        Platform::Mac
    } else if WIN_RE.is_match(ident) {
        Platform::Windows
    } else {
        Platform::Linux
    }
}

/// Platform of the running process.
pub fn current_platform() -> Platform {
    detect_platform(std::env::consts::OS)
}

/// Use `override_name` when set, otherwise detect.
pub fn resolve_platform(override_name: Option<&str>) -> Result<Platform, PlatformError> {
    match override_name {
        Some(name) => Platform::from_name(name),
        None => Ok(current_platform()),
    }
}
