use serde::{Deserialize, Serialize};

use crate::platform::Platform;

use super::normalize::normalize_combo;

/// A modifier token as it appears in a combo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Modifier {
    Control,
    Meta,
    Alt,
    Shift,
}

impl Modifier {
    /// Canonical ordering inside a match key.
    pub const ORDER: [Modifier; 4] = [
        Modifier::Control,
        Modifier::Meta,
        Modifier::Alt,
        Modifier::Shift,
    ];

    /// Token used in combo definitions and key events.
    pub fn token(self) -> &'static str {
        match self {
            Modifier::Control => "Control",
            Modifier::Meta => "Meta",
            Modifier::Alt => "Alt",
            Modifier::Shift => "Shift",
        }
    }

    /// Case-insensitive match of an exact modifier token.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_lowercase().as_str() {
            "control" => Some(Modifier::Control),
            "meta" => Some(Modifier::Meta),
            "alt" => Some(Modifier::Alt),
            "shift" => Some(Modifier::Shift),
            _ => None,
        }
    }

    pub(crate) fn rank(self) -> usize {
        self as usize
    }
}

/// One key combination of a shortcut, optionally restricted to some
/// platforms. `platforms: None` applies everywhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combo {
    pub keys: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platforms: Option<Vec<Platform>>,
}

impl Combo {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            platforms: None,
        }
    }

    pub fn on(mut self, platforms: &[Platform]) -> Self {
        self.platforms = Some(platforms.to_vec());
        self
    }

    pub fn applies_to(&self, platform: Platform) -> bool {
        match self.platforms {
            Some(ref platforms) => platforms.contains(&platform),
            None => true,
        }
    }

    pub fn canonical_key(&self) -> String {
        normalize_combo(&self.keys)
    }
}
