use std::collections::{HashMap, HashSet};

use arc_config::{Settings, SettingsDefaults};
use tracing::{debug, warn};

use crate::keymap::combo_to_display;
use crate::platform::Platform;
use crate::shortcuts::{builtin_shortcuts, Category, ShortcutCategory, ShortcutDefinition};

use super::key_event::{event_to_combo_key, KeyEvent};

/// Canonical combo key -> candidate shortcuts for one platform.
///
/// Candidates under a key keep table definition order; resolution picks
/// the first enabled one. Immutable once built.
pub struct ShortcutRegistry {
    platform: Platform,
    shortcuts: Vec<ShortcutDefinition>,
    by_key: HashMap<String, Vec<usize>>,
}

impl ShortcutRegistry {
    /// Build from an explicit table. Entries with a duplicate id are
    /// logged and skipped.
    pub fn new(table: Vec<ShortcutDefinition>, platform: Platform) -> Self {
        let mut seen = HashSet::new();
        let mut shortcuts = Vec::with_capacity(table.len());
        for shortcut in table {
            if !seen.insert(shortcut.id.clone()) {
                warn!(id = %shortcut.id, "duplicate shortcut id, skipping");
                continue;
            }
            shortcuts.push(shortcut);
        }

        let mut by_key: HashMap<String, Vec<usize>> = HashMap::new();
        for (index, shortcut) in shortcuts.iter().enumerate() {
            for combo in shortcut.combos_for(platform) {
                let key = combo.canonical_key();
                if key.is_empty() {
                    continue;
                }
                let entry = by_key.entry(key).or_default();
                // two combos of one shortcut may normalize to the same key
                if !entry.contains(&index) {
                    entry.push(index);
                }
            }
        }

        debug!(
            platform = %platform,
            shortcuts = shortcuts.len(),
            keys = by_key.len(),
            "built shortcut registry"
        );

        Self {
            platform,
            shortcuts,
            by_key,
        }
    }

    /// Registry over the shipped table.
    pub fn builtin(platform: Platform) -> Self {
        Self::new(builtin_shortcuts().to_vec(), platform)
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Every candidate for a canonical key, in definition order.
    pub fn resolve(&self, key: &str) -> Vec<&ShortcutDefinition> {
        self.by_key
            .get(key)
            .map(|indices| indices.iter().map(|&i| &self.shortcuts[i]).collect())
            .unwrap_or_default()
    }

    /// First candidate whose feature flag is enabled.
    pub fn resolve_enabled(&self, key: &str, settings: &Settings) -> Option<&ShortcutDefinition> {
        self.by_key.get(key)?.iter().map(|&i| &self.shortcuts[i]).find(|s| settings.is_enabled(&s.id))
    }

    pub fn resolve_event(&self, event: &KeyEvent, settings: &Settings) -> Option<&ShortcutDefinition> {
        let key = event_to_combo_key(event)?;
        self.resolve_enabled(&key, settings)
    }

    pub fn get(&self, id: &str) -> Option<&ShortcutDefinition> {
        self.shortcuts.iter().find(|s| s.id == id)
    }

    pub fn all(&self) -> &[ShortcutDefinition] {
        &self.shortcuts
    }

    pub fn categories(&self) -> Vec<Category> {
        ShortcutCategory::ALL.into_iter().map(Category::from).collect()
    }

    pub fn shortcut_ids(&self) -> Vec<String> {
        self.shortcuts.iter().map(|s| s.id.clone()).collect()
    }

    pub fn settings_defaults(&self) -> SettingsDefaults {
        SettingsDefaults::new(self.shortcut_ids())
    }

    /// First combo of `id` that applies here, rendered for display.
    pub fn display_for(&self, id: &str) -> Option<String> {
        let shortcut = self.get(id)?;
        let combo = shortcut.combos_for(self.platform).next()?;
        Some(combo_to_display(&combo.keys, self.platform))
    }

    /// Canonical keys for this platform, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.by_key.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.shortcuts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shortcuts.is_empty()
    }
}
