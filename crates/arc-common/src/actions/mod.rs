mod action_enum;
mod classify;
mod unsupported;

pub use action_enum::*;
pub use unsupported::UnsupportedReason;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_actions_round_trip_through_wire_names() {
        for action in ActionId::known() {
            assert_eq!(ActionId::parse(action.as_str()), action);
        }
    }

    #[test]
    fn unsupported_prefix_is_intercepted() {
        assert_eq!(
            ActionId::parse("unsupported-sidebar"),
            ActionId::Unsupported(UnsupportedReason::Sidebar)
        );
        let other = ActionId::parse("unsupported-teleport");
        assert_eq!(
            other,
            ActionId::Unsupported(UnsupportedReason::Other("unsupported-teleport".into()))
        );
        assert_eq!(other.as_str(), "unsupported-teleport");
    }

    #[test]
    fn unrecognized_names_are_kept_verbatim() {
        let action = ActionId::parse("openCommandBar");
        assert_eq!(action, ActionId::Unknown("openCommandBar".into()));
        assert_eq!(action.to_string(), "openCommandBar");
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&ActionId::CopyUrlMarkdown).unwrap();
        assert_eq!(json, "\"copyUrlMarkdown\"");

        let back: ActionId = serde_json::from_str("\"goToLastTab\"").unwrap();
        assert_eq!(back, ActionId::GoToLastTab);

        let split: ActionId = serde_json::from_str("\"unsupported-split-focus\"").unwrap();
        assert_eq!(split, ActionId::Unsupported(UnsupportedReason::SplitFocus));
    }

    #[test]
    fn page_local_actions() {
        assert!(ActionId::Find.is_page_local());
        assert!(ActionId::CopyUrl.is_page_local());
        assert!(ActionId::CopyUrlMarkdown.is_page_local());
        assert!(!ActionId::NewTab.is_page_local());
    }

    #[test]
    fn split_reasons_share_a_message() {
        assert_eq!(
            UnsupportedReason::SplitAdd.message(),
            UnsupportedReason::SplitFocus.message()
        );
        assert_ne!(
            UnsupportedReason::Sidebar.message(),
            UnsupportedReason::ChangeUrl.message()
        );
    }
}
