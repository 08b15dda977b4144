use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Key the settings document is persisted under.
pub const STORAGE_KEY: &str = "arcCommandSettings";

/// User settings: the master arc-mode switch plus per-shortcut enablement.
///
/// Ids missing from `per_shortcut_enabled` count as enabled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(rename = "arcMode", default)]
    pub arc_mode_enabled: bool,
    #[serde(rename = "features", default)]
    pub per_shortcut_enabled: BTreeMap<String, bool>,
}

impl Settings {
    pub fn is_enabled(&self, shortcut_id: &str) -> bool {
        self.per_shortcut_enabled
            .get(shortcut_id)
            .copied()
            .unwrap_or(true)
    }

    pub fn to_value(&self) -> Value {
        let features: serde_json::Map<String, Value> = self
            .per_shortcut_enabled
            .iter()
            .map(|(id, on)| (id.clone(), Value::Bool(*on)))
            .collect();
        serde_json::json!({
            "arcMode": self.arc_mode_enabled,
            "features": features,
        })
    }
}

/// Default-fill rules for settings, built from the shipped shortcut ids.
#[derive(Debug, Clone, Default)]
pub struct SettingsDefaults {
    shortcut_ids: Vec<String>,
}

impl SettingsDefaults {
    pub fn new<I, S>(shortcut_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            shortcut_ids: shortcut_ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn shortcut_ids(&self) -> &[String] {
        &self.shortcut_ids
    }

    /// Arc mode off, every shortcut enabled.
    pub fn settings(&self) -> Settings {
        Settings {
            arc_mode_enabled: false,
            per_shortcut_enabled: self
                .shortcut_ids
                .iter()
                .map(|id| (id.clone(), true))
                .collect(),
        }
    }

    /// Merge a raw stored document over the defaults.
    ///
    /// Total over arbitrary JSON: anything that is not an object yields the
    /// defaults. `arcMode` is coerced by truthiness, a feature is off only
    /// when stored as `false`, and flags for ids the defaults do not know
    /// are preserved.
    pub fn merge(&self, raw: Option<&Value>) -> Settings {
        let mut settings = self.settings();
        let Some(Value::Object(obj)) = raw else {
            return settings;
        };

        settings.arc_mode_enabled = obj.get("arcMode").map(truthy).unwrap_or(false);
        if let Some(Value::Object(features)) = obj.get("features") {
            for (id, flag) in features {
                settings.per_shortcut_enabled.insert(id.clone(), feature_flag(flag));
            }
        }
        settings
    }

    /// Add any default ids missing from `settings`.
    pub fn fill(&self, mut settings: Settings) -> Settings {
        for id in &self.shortcut_ids {
            settings
                .per_shortcut_enabled
                .entry(id.clone())
                .or_insert(true);
        }
        settings
    }
}

/// Shortcuts stay on unless explicitly switched off.
fn feature_flag(value: &Value) -> bool {
    !matches!(value, Value::Bool(false))
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn defaults() -> SettingsDefaults {
        SettingsDefaults::new(["new-tab", "close-tab", "reload", "zoom-in", "find"])
    }

    #[test]
    fn merge_none_is_defaults() {
        let d = defaults();
        assert_eq!(d.merge(None), d.settings());
    }

    #[test]
    fn merge_non_object_is_defaults() {
        let d = defaults();
        assert_eq!(d.merge(Some(&json!(42))), d.settings());
        assert_eq!(d.merge(Some(&json!("on"))), d.settings());
        assert_eq!(d.merge(Some(&Value::Null)), d.settings());
    }

    #[test]
    fn merge_arc_mode_only_keeps_default_features() {
        let d = defaults();
        let merged = d.merge(Some(&json!({ "arcMode": true })));
        assert!(merged.arc_mode_enabled);
        assert_eq!(merged.per_shortcut_enabled, d.settings().per_shortcut_enabled);
    }

    #[test]
    fn empty_document_enables_every_shortcut() {
        let merged = defaults().merge(Some(&json!({})));
        assert!(!merged.arc_mode_enabled);
        assert_eq!(merged.per_shortcut_enabled.len(), 5);
        assert!(merged.per_shortcut_enabled.values().all(|on| *on));
    }

    #[test]
    fn stored_flags_override_defaults() {
        let merged = defaults().merge(Some(&json!({
            "arcMode": 1,
            "features": { "reload": false, "retired-shortcut": false }
        })));
        assert!(merged.arc_mode_enabled);
        assert!(!merged.is_enabled("reload"));
        assert!(merged.is_enabled("find"));
        assert!(!merged.is_enabled("retired-shortcut"));
    }

    #[test]
    fn only_explicit_false_disables_a_feature() {
        let merged = defaults().merge(Some(&json!({
            "features": { "reload": null, "find": 0, "zoom-in": "", "new-tab": false }
        })));
        assert!(merged.is_enabled("reload"));
        assert!(merged.is_enabled("find"));
        assert!(merged.is_enabled("zoom-in"));
        assert!(!merged.is_enabled("new-tab"));
    }

    #[test]
    fn missing_id_resolves_enabled() {
        let settings = Settings::default();
        assert!(settings.is_enabled("anything"));
    }

    #[test]
    fn fill_adds_only_missing_ids() {
        let mut partial = Settings::default();
        partial.per_shortcut_enabled.insert("reload".into(), false);
        let filled = defaults().fill(partial);
        assert_eq!(filled.per_shortcut_enabled.len(), 5);
        assert!(!filled.is_enabled("reload"));
    }

    #[test]
    fn wire_names_are_arc_mode_and_features() {
        let mut settings = Settings::default();
        settings.arc_mode_enabled = true;
        settings.per_shortcut_enabled.insert("find".into(), false);
        let value = serde_json::to_value(&settings).unwrap();
        assert_eq!(value, json!({ "arcMode": true, "features": { "find": false } }));
        assert_eq!(settings.to_value(), value);
    }

    #[test]
    fn merge_of_own_output_is_identity() {
        let d = defaults();
        let merged = d.merge(Some(&json!({ "arcMode": true, "features": { "find": false } })));
        assert_eq!(d.merge(Some(&merged.to_value())), merged);
    }
}
