use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Prefix for non-URL queries; the encoded query is appended.
    pub search_url: String,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            search_url: "https://www.google.com/search?q=".into(),
        }
    }
}
