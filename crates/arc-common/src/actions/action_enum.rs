use serde::{Deserialize, Serialize};

use super::UnsupportedReason;

/// Every action a shortcut can trigger.
///
/// Keybinds, the command overlay and runtime messages all resolve to an
/// `ActionId`. The wire form is the camelCase action name
/// (`"newTab"`, `"goToTab"`, `"unsupported-sidebar"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionId {
    // -- Tabs --
    NewTab,
    CloseTab,
    ReopenTab,
    PinTab,
    ClearUnpinned,

    // -- Windows --
    NewWindow,
    NewIncognito,
    LittleArc,

    // -- Navigation --
    GoToTab,
    GoToLastTab,
    NextTab,
    PreviousTab,
    NextWindow,
    PreviousWindow,
    FocusSpace,
    ToggleRecent,

    // -- History --
    HistoryBack,
    HistoryForward,
    OpenHistory,
    Reload,

    // -- Zoom --
    ZoomIn,
    ZoomOut,
    ResetZoom,

    // -- Page-local --
    Find,
    CopyUrl,
    CopyUrlMarkdown,

    /// No host equivalent; only ever produces a notification.
    Unsupported(UnsupportedReason),

    /// An action id this build does not know. Performing it is a no-op.
    Unknown(String),
}

impl ActionId {
    /// Wire name of the action.
    pub fn as_str(&self) -> &str {
        match self {
            ActionId::NewTab => "newTab",
            ActionId::CloseTab => "closeTab",
            ActionId::ReopenTab => "reopenTab",
            ActionId::PinTab => "pinTab",
            ActionId::ClearUnpinned => "clearUnpinned",
            ActionId::NewWindow => "newWindow",
            ActionId::NewIncognito => "newIncognito",
            ActionId::LittleArc => "littleArc",
            ActionId::GoToTab => "goToTab",
            ActionId::GoToLastTab => "goToLastTab",
            ActionId::NextTab => "nextTab",
            ActionId::PreviousTab => "previousTab",
            ActionId::NextWindow => "nextWindow",
            ActionId::PreviousWindow => "previousWindow",
            ActionId::FocusSpace => "focusSpace",
            ActionId::ToggleRecent => "toggleRecent",
            ActionId::HistoryBack => "historyBack",
            ActionId::HistoryForward => "historyForward",
            ActionId::OpenHistory => "openHistory",
            ActionId::Reload => "reload",
            ActionId::ZoomIn => "zoomIn",
            ActionId::ZoomOut => "zoomOut",
            ActionId::ResetZoom => "resetZoom",
            ActionId::Find => "find",
            ActionId::CopyUrl => "copyUrl",
            ActionId::CopyUrlMarkdown => "copyUrlMarkdown",
            ActionId::Unsupported(reason) => reason.as_str(),
            ActionId::Unknown(name) => name,
        }
    }

    /// Parse a wire name. Never fails: unrecognized names become
    /// [`ActionId::Unknown`] and `unsupported*` names become
    /// [`ActionId::Unsupported`].
    pub fn parse(name: &str) -> Self {
        match name {
            "newTab" => ActionId::NewTab,
            "closeTab" => ActionId::CloseTab,
            "reopenTab" => ActionId::ReopenTab,
            "pinTab" => ActionId::PinTab,
            "clearUnpinned" => ActionId::ClearUnpinned,
            "newWindow" => ActionId::NewWindow,
            "newIncognito" => ActionId::NewIncognito,
            "littleArc" => ActionId::LittleArc,
            "goToTab" => ActionId::GoToTab,
            "goToLastTab" => ActionId::GoToLastTab,
            "nextTab" => ActionId::NextTab,
            "previousTab" => ActionId::PreviousTab,
            "nextWindow" => ActionId::NextWindow,
            "previousWindow" => ActionId::PreviousWindow,
            "focusSpace" => ActionId::FocusSpace,
            "toggleRecent" => ActionId::ToggleRecent,
            "historyBack" => ActionId::HistoryBack,
            "historyForward" => ActionId::HistoryForward,
            "openHistory" => ActionId::OpenHistory,
            "reload" => ActionId::Reload,
            "zoomIn" => ActionId::ZoomIn,
            "zoomOut" => ActionId::ZoomOut,
            "resetZoom" => ActionId::ResetZoom,
            "find" => ActionId::Find,
            "copyUrl" => ActionId::CopyUrl,
            "copyUrlMarkdown" => ActionId::CopyUrlMarkdown,
            other if other.starts_with("unsupported") => {
                ActionId::Unsupported(UnsupportedReason::parse(other))
            }
            other => ActionId::Unknown(other.to_string()),
        }
    }
}

impl From<String> for ActionId {
    fn from(s: String) -> Self {
        ActionId::parse(&s)
    }
}

impl From<ActionId> for String {
    fn from(action: ActionId) -> Self {
        action.as_str().to_string()
    }
}

impl std::fmt::Display for ActionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
