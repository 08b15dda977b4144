//! Messages the privileged context accepts, and the port they travel on.

use arc_common::{ActionId, BridgeError, TabId, TabInfo};
use arc_config::Settings;
use arc_platform::ShortcutDefinition;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Extra data accompanying a `perform`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortcut_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab_id: Option<TabId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortcut_data: Option<ShortcutDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl PerformContext {
    pub fn for_shortcut(shortcut: &ShortcutDefinition) -> Self {
        Self {
            shortcut_id: Some(shortcut.id.clone()),
            shortcut_data: Some(shortcut.clone()),
            ..Self::default()
        }
    }

    pub fn tab_index(&self) -> Option<usize> {
        self.shortcut_data.as_ref().and_then(|s| s.tab_index)
    }

    pub fn space_index(&self) -> Option<usize> {
        self.shortcut_data.as_ref().and_then(|s| s.space_index)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum RuntimeMessage {
    Perform {
        #[serde(rename = "actionId")]
        action_id: ActionId,
        #[serde(flatten)]
        context: PerformContext,
    },
    GetSettings,
    SetArcMode {
        #[serde(rename = "arcMode")]
        arc_mode: bool,
    },
    SetFeature {
        #[serde(rename = "shortcutId")]
        shortcut_id: String,
        enabled: bool,
    },
    GetTabs,
    ActivateTab {
        #[serde(rename = "tabId")]
        tab_id: TabId,
    },
    CreateTab {
        url: String,
    },
}

impl RuntimeMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            RuntimeMessage::Perform { .. } => "perform",
            RuntimeMessage::GetSettings => "get-settings",
            RuntimeMessage::SetArcMode { .. } => "set-arc-mode",
            RuntimeMessage::SetFeature { .. } => "set-feature",
            RuntimeMessage::GetTabs => "get-tabs",
            RuntimeMessage::ActivateTab { .. } => "activate-tab",
            RuntimeMessage::CreateTab { .. } => "create-tab",
        }
    }
}

/// Reply to a [`RuntimeMessage`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuntimeResponse {
    Ok { ok: bool },
    Settings { settings: Settings },
    Tabs { tabs: Vec<TabInfo> },
    Error { error: String },
}

impl RuntimeResponse {
    pub fn ok() -> Self {
        RuntimeResponse::Ok { ok: true }
    }

    pub fn error(message: impl Into<String>) -> Self {
        RuntimeResponse::Error {
            error: message.into(),
        }
    }

    /// Turn an `{error}` reply into a bridge error.
    pub fn into_result(self) -> Result<Self, BridgeError> {
        match self {
            RuntimeResponse::Error { error } => Err(BridgeError::Remote(error)),
            other => Ok(other),
        }
    }
}

/// Privileged → tab relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TabMessage {
    #[serde(rename = "pageAction")]
    PageAction {
        #[serde(rename = "actionId")]
        action_id: ActionId,
    },
}

/// Delivers runtime messages to the privileged context. `sender` is the
/// tab the message originates from, when there is one.
#[async_trait]
pub trait RuntimePort: Send + Sync {
    async fn send(
        &self,
        message: RuntimeMessage,
        sender: Option<TabId>,
    ) -> Result<RuntimeResponse, BridgeError>;
}
