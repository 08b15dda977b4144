//! The browser surface the privileged side drives.
//!
//! [`HostActionService`] is the seam between action execution and a real
//! browser. [`SimulatedHost`] implements it in memory for the `simulate`
//! command and for tests.

mod sim;

pub use sim::{SimulatedHost, NEW_TAB_URL};

use arc_bridge::TabMessage;
use arc_common::{ActionError, Notification, TabId, TabInfo, WindowId, WindowInfo, WindowKind};
use async_trait::async_trait;

/// Which window a tab query is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowScope {
    Current,
    LastFocused,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabQuery {
    pub window: Option<WindowScope>,
    pub active: Option<bool>,
    pub pinned: Option<bool>,
}

impl TabQuery {
    pub fn current_window() -> Self {
        Self {
            window: Some(WindowScope::Current),
            ..Self::default()
        }
    }

    /// The active tab of the last focused window.
    pub fn active_in_last_focused() -> Self {
        Self {
            window: Some(WindowScope::LastFocused),
            active: Some(true),
            pinned: None,
        }
    }

    pub fn pinned(mut self, pinned: bool) -> Self {
        self.pinned = Some(pinned);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateTab {
    pub url: Option<String>,
}

impl CreateTab {
    pub fn url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TabUpdate {
    pub active: Option<bool>,
    pub pinned: Option<bool>,
}

impl TabUpdate {
    pub fn activate() -> Self {
        Self {
            active: Some(true),
            pinned: None,
        }
    }

    pub fn pin(pinned: bool) -> Self {
        Self {
            active: None,
            pinned: Some(pinned),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateWindow {
    pub kind: WindowKind,
    pub incognito: bool,
    pub focused: bool,
    pub url: Option<String>,
    pub size: Option<(u32, u32)>,
}

impl CreateWindow {
    pub fn normal() -> Self {
        Self {
            kind: WindowKind::Normal,
            incognito: false,
            focused: true,
            url: None,
            size: None,
        }
    }

    pub fn incognito() -> Self {
        Self {
            incognito: true,
            ..Self::normal()
        }
    }

    pub fn popup(url: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            kind: WindowKind::Popup,
            url: Some(url.into()),
            size: Some((width, height)),
            ..Self::normal()
        }
    }
}

/// Tab, window, navigation, zoom, session and notification operations.
#[async_trait]
pub trait HostActionService: Send + Sync {
    async fn create_tab(&self, props: CreateTab) -> Result<TabInfo, ActionError>;

    async fn remove_tabs(&self, ids: &[TabId]) -> Result<(), ActionError>;

    async fn get_tab(&self, id: TabId) -> Result<TabInfo, ActionError>;

    async fn update_tab(&self, id: TabId, update: TabUpdate) -> Result<TabInfo, ActionError>;

    /// Matching tabs in tab-strip order.
    async fn query_tabs(&self, query: TabQuery) -> Result<Vec<TabInfo>, ActionError>;

    async fn get_zoom(&self, id: TabId) -> Result<f64, ActionError>;

    async fn set_zoom(&self, id: TabId, factor: f64) -> Result<(), ActionError>;

    async fn go_back(&self, id: TabId) -> Result<(), ActionError>;

    async fn go_forward(&self, id: TabId) -> Result<(), ActionError>;

    async fn reload(&self, id: TabId) -> Result<(), ActionError>;

    async fn create_window(&self, props: CreateWindow) -> Result<WindowInfo, ActionError>;

    async fn focus_window(&self, id: WindowId) -> Result<(), ActionError>;

    /// Windows of `kind` (all kinds when `None`), in creation order.
    async fn list_windows(&self, kind: Option<WindowKind>) -> Result<Vec<WindowInfo>, ActionError>;

    /// Reopen the most recently closed tab.
    async fn restore_session(&self) -> Result<(), ActionError>;

    async fn notify(&self, notification: Notification) -> Result<(), ActionError>;

    async fn relay_to_tab(&self, id: TabId, message: TabMessage) -> Result<(), ActionError>;
}
