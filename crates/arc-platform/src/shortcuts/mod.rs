//! The shortcut table shipped with the crate.

mod table;
mod types;

pub use table::builtin_shortcuts;
pub use types::{Category, ShortcutCategory, ShortcutDefinition};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Platform;
    use arc_common::ActionId;
    use std::collections::HashSet;

    #[test]
    fn table_has_forty_one_unique_entries() {
        let table = builtin_shortcuts();
        assert_eq!(table.len(), 41);
        let ids: HashSet<&str> = table.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids.len(), 41);
    }

    #[test]
    fn every_action_is_known_or_unsupported() {
        for shortcut in builtin_shortcuts() {
            assert!(
                !matches!(shortcut.action, ActionId::Unknown(_)),
                "{} has unknown action",
                shortcut.id
            );
        }
    }

    #[test]
    fn go_to_tab_entries_carry_indices() {
        let table = builtin_shortcuts();
        let tab3 = table.iter().find(|s| s.id == "tab-3").unwrap();
        assert_eq!(tab3.action, ActionId::GoToTab);
        assert_eq!(tab3.tab_index, Some(2));
        assert_eq!(tab3.command_id.as_deref(), Some("arc-go-tab-3"));
    }

    #[test]
    fn focus_space_is_mac_only() {
        let space = builtin_shortcuts()
            .iter()
            .find(|s| s.id == "focusSpace2")
            .unwrap();
        assert_eq!(space.space_index, Some(1));
        assert_eq!(space.combos_for(Platform::Mac).count(), 1);
        assert_eq!(space.combos_for(Platform::Linux).count(), 0);
    }

    #[test]
    fn zoom_in_has_two_combos_per_platform() {
        let zoom = builtin_shortcuts().iter().find(|s| s.id == "zoomIn").unwrap();
        assert_eq!(zoom.combos_for(Platform::Mac).count(), 2);
        assert_eq!(zoom.combos_for(Platform::Windows).count(), 2);
    }

    #[test]
    fn history_alt_arrows_apply_everywhere() {
        let back = builtin_shortcuts()
            .iter()
            .find(|s| s.id == "historyBack")
            .unwrap();
        assert_eq!(back.combos_for(Platform::Mac).count(), 2);
        assert_eq!(back.combos_for(Platform::Linux).count(), 1);
    }

    #[test]
    fn categories_in_display_order() {
        let labels: Vec<&str> = ShortcutCategory::ALL.iter().map(|c| c.label()).collect();
        assert_eq!(labels, vec!["Actions", "Everyday Use", "Quick Navigation"]);
        assert_eq!(ShortcutCategory::from_id("everyday"), Some(ShortcutCategory::Everyday));
        assert_eq!(ShortcutCategory::from_id("other"), None);
    }

    #[test]
    fn definitions_serialize_with_wire_names() {
        let tab1 = builtin_shortcuts().iter().find(|s| s.id == "tab-1").unwrap();
        let json = serde_json::to_value(tab1).unwrap();
        assert_eq!(json["action"], "goToTab");
        assert_eq!(json["tabIndex"], 0);
        assert_eq!(json["category"], "navigation");
        assert_eq!(json["commandId"], "arc-go-tab-1");
        assert!(json.get("spaceIndex").is_none());
    }
}
