use arc_common::PlatformError;
use serde::{Deserialize, Serialize};

use crate::keymap::{normalize_combo, parse_combo, Modifier};
use crate::platform::Platform;

/// A captured key press: the reported key value plus held modifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: String,
    #[serde(default)]
    pub meta: bool,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub shift: bool,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn meta(mut self) -> Self {
        self.meta = true;
        self
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    /// Build the event a keyboard would report for a human-readable combo
    /// like `"Cmd+Shift+T"`.
    pub fn from_combo_str(s: &str) -> Result<Self, PlatformError> {
        let combo = parse_combo(s)?;
        let mut event = KeyEvent::default();
        for token in &combo.keys {
            match Modifier::from_token(token) {
                Some(Modifier::Meta) => event.meta = true,
                Some(Modifier::Control) => event.ctrl = true,
                Some(Modifier::Alt) => event.alt = true,
                Some(Modifier::Shift) => event.shift = true,
                None => event.key = token.clone(),
            }
        }
        if event.key.is_empty() {
            // modifier-only combo: the last modifier is the pressed key
            if let Some(last) = combo.keys.last() {
                event.key = last.clone();
            }
        }
        Ok(event)
    }
}

/// Canonical match key for a key event, or `None` when nothing usable was
/// pressed.
pub fn event_to_combo_key(event: &KeyEvent) -> Option<String> {
    if event.key.is_empty() {
        return None;
    }

    let mut keys: Vec<String> = Vec::with_capacity(5);
    if event.meta {
        keys.push(Modifier::Meta.token().into());
    }
    if event.ctrl {
        keys.push(Modifier::Control.token().into());
    }
    if event.alt {
        keys.push(Modifier::Alt.token().into());
    }
    if event.shift {
        keys.push(Modifier::Shift.token().into());
    }

    if Modifier::from_token(&event.key).is_none() {
        if event.key.chars().count() == 1 {
            keys.push(event.key.to_lowercase());
        } else {
            keys.push(event.key.clone());
        }
    }

    if keys.is_empty() {
        return None;
    }
    Some(normalize_combo(&keys))
}

/// Canonical key of the overlay toggle on `platform`.
pub fn overlay_toggle_key(platform: Platform) -> &'static str {
    match platform {
        Platform::Mac => "meta+k",
        Platform::Windows | Platform::Linux => "control+k",
    }
}

/// Exact-modifier check for the overlay toggle: `Meta+k` on mac,
/// `Control+k` elsewhere, with no other modifier held.
pub fn is_overlay_toggle(event: &KeyEvent, platform: Platform) -> bool {
    if event.key != "k" || event.shift || event.alt {
        return false;
    }
    match platform {
        Platform::Mac => event.meta && !event.ctrl,
        Platform::Windows | Platform::Linux => event.ctrl && !event.meta,
    }
}
