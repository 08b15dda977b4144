use serde::{Deserialize, Serialize};

/// Why a shortcut has no host equivalent. Selects the notification text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnsupportedReason {
    ChangeUrl,
    Sidebar,
    SplitAdd,
    SplitClose,
    SplitFocus,
    Other(String),
}

impl UnsupportedReason {
    pub fn as_str(&self) -> &str {
        match self {
            UnsupportedReason::ChangeUrl => "unsupported-change-url",
            UnsupportedReason::Sidebar => "unsupported-sidebar",
            UnsupportedReason::SplitAdd => "unsupported-split-add",
            UnsupportedReason::SplitClose => "unsupported-split-close",
            UnsupportedReason::SplitFocus => "unsupported-split-focus",
            UnsupportedReason::Other(name) => name,
        }
    }

    pub fn parse(name: &str) -> Self {
        match name {
            "unsupported-change-url" => UnsupportedReason::ChangeUrl,
            "unsupported-sidebar" => UnsupportedReason::Sidebar,
            "unsupported-split-add" => UnsupportedReason::SplitAdd,
            "unsupported-split-close" => UnsupportedReason::SplitClose,
            "unsupported-split-focus" => UnsupportedReason::SplitFocus,
            other => UnsupportedReason::Other(other.to_string()),
        }
    }

    /// User-facing notification text.
    pub fn message(&self) -> &'static str {
        match self {
            UnsupportedReason::ChangeUrl => {
                "Changing the address bar via shortcut is unavailable."
            }
            UnsupportedReason::Sidebar => "The browser does not expose a sidebar toggle API.",
            UnsupportedReason::SplitAdd
            | UnsupportedReason::SplitClose
            | UnsupportedReason::SplitFocus => "Split View is not supported in this browser.",
            UnsupportedReason::Other(_) => "This Arc shortcut is not supported in this browser.",
        }
    }
}
