use super::ActionId;

impl ActionId {
    /// Actions executed inside the page by the content script rather than
    /// by the privileged process.
    pub fn is_page_local(&self) -> bool {
        matches!(
            self,
            ActionId::Find | ActionId::CopyUrl | ActionId::CopyUrlMarkdown
        )
    }

    /// Every action this build knows how to perform, in table order.
    pub fn known() -> Vec<ActionId> {
        vec![
            ActionId::NewTab,
            ActionId::CloseTab,
            ActionId::ReopenTab,
            ActionId::PinTab,
            ActionId::ClearUnpinned,
            ActionId::NewWindow,
            ActionId::NewIncognito,
            ActionId::LittleArc,
            ActionId::GoToTab,
            ActionId::GoToLastTab,
            ActionId::NextTab,
            ActionId::PreviousTab,
            ActionId::NextWindow,
            ActionId::PreviousWindow,
            ActionId::FocusSpace,
            ActionId::ToggleRecent,
            ActionId::HistoryBack,
            ActionId::HistoryForward,
            ActionId::OpenHistory,
            ActionId::Reload,
            ActionId::ZoomIn,
            ActionId::ZoomOut,
            ActionId::ResetZoom,
            ActionId::Find,
            ActionId::CopyUrl,
            ActionId::CopyUrlMarkdown,
        ]
    }
}
