use arc_common::TabId;
use arc_platform::ShortcutDefinition;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverlayMode {
    #[default]
    Shortcuts,
    Tabs,
}

impl OverlayMode {
    pub fn toggled(self) -> Self {
        match self {
            OverlayMode::Shortcuts => OverlayMode::Tabs,
            OverlayMode::Tabs => OverlayMode::Shortcuts,
        }
    }
}

/// Load state. `Error` is terminal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OverlayStatus {
    #[default]
    Loading,
    Ready,
    Error(String),
}

/// What confirming the highlighted entry asks the bridge to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayCommand {
    Perform(ShortcutDefinition),
    ActivateTab(TabId),
    /// No tab matched; open the query as a URL or a search.
    OpenQuery(String),
}
