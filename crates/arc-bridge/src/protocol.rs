//! Wire messages exchanged over the shared message channel.

use arc_common::BridgeError;
use arc_config::StorageChange;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Everything posted on the page/mediator channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BridgeMessage {
    #[serde(rename = "bridge-request")]
    Request {
        id: String,
        method: String,
        #[serde(default)]
        args: Vec<Value>,
    },

    /// Carries exactly one of `result` or `error`.
    #[serde(rename = "bridge-response")]
    Response {
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        result: Option<Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },

    #[serde(rename = "storage-changed")]
    StorageChanged { changes: Vec<StorageChange> },

    #[serde(rename = "toggle-overlay")]
    ToggleOverlay,

    #[serde(rename = "bridge-ready")]
    Ready,
}

impl BridgeMessage {
    pub fn ok(id: impl Into<String>, result: Value) -> Self {
        BridgeMessage::Response {
            id: id.into(),
            result: Some(result),
            error: None,
        }
    }

    pub fn err(id: impl Into<String>, error: impl Into<String>) -> Self {
        BridgeMessage::Response {
            id: id.into(),
            result: None,
            error: Some(error.into()),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, BridgeError> {
        serde_json::from_str(raw).map_err(|e| BridgeError::Protocol(e.to_string()))
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Methods the mediator answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BridgeMethod {
    StorageGet,
    StorageSet,
    SendMessage,
    LoadShortcuts,
    GetTabs,
    ActivateTab,
    CreateTab,
}

impl BridgeMethod {
    pub const ALL: [BridgeMethod; 7] = [
        BridgeMethod::StorageGet,
        BridgeMethod::StorageSet,
        BridgeMethod::SendMessage,
        BridgeMethod::LoadShortcuts,
        BridgeMethod::GetTabs,
        BridgeMethod::ActivateTab,
        BridgeMethod::CreateTab,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BridgeMethod::StorageGet => "storageGet",
            BridgeMethod::StorageSet => "storageSet",
            BridgeMethod::SendMessage => "sendMessage",
            BridgeMethod::LoadShortcuts => "loadShortcuts",
            BridgeMethod::GetTabs => "getTabs",
            BridgeMethod::ActivateTab => "activateTab",
            BridgeMethod::CreateTab => "createTab",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.name() == name)
    }
}

impl fmt::Display for BridgeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
