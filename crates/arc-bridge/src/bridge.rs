use std::sync::Arc;
use std::time::Duration;

use arc_common::{BridgeError, TabId, TabInfo};
use arc_platform::{Category, ShortcutDefinition};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::channel::MessageChannel;
use crate::client::RelayClient;
use crate::handler::BridgeHandler;
use crate::protocol::BridgeMethod;
use crate::runtime::{RuntimeMessage, RuntimeResponse};
use crate::transport::{BridgeTransport, InProcessTransport, TransportKind, UnavailableTransport};

/// What `loadShortcuts` returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortcutCatalog {
    #[serde(rename = "SHORTCUTS")]
    pub shortcuts: Vec<ShortcutDefinition>,
    #[serde(rename = "SHORTCUT_CATEGORIES")]
    pub categories: Vec<Category>,
}

/// What the calling context can reach, detected once at startup.
#[derive(Default, Clone)]
pub struct Capabilities {
    /// Direct access to a handler backed by privileged APIs.
    pub privileged: Option<Arc<dyn BridgeHandler>>,
    /// The shared message channel to a mediator.
    pub channel: Option<MessageChannel>,
}

/// Typed bridge API over whichever transport was detected.
#[derive(Clone)]
pub struct Bridge {
    transport: Arc<dyn BridgeTransport>,
}

impl Bridge {
    pub fn new(transport: Arc<dyn BridgeTransport>) -> Self {
        Self { transport }
    }

    /// Pick the transport once: in-process when privileged APIs are at
    /// hand, the relay when only the channel is, unavailable otherwise.
    pub fn detect(capabilities: Capabilities, request_timeout: Duration) -> Self {
        let transport: Arc<dyn BridgeTransport> = match capabilities {
            Capabilities {
                privileged: Some(handler),
                ..
            } => Arc::new(InProcessTransport::new(handler)),
            Capabilities {
                channel: Some(channel),
                ..
            } => Arc::new(RelayClient::new(channel, request_timeout)),
            Capabilities { .. } => {
                warn!("no message channel or privileged APIs, bridge disabled");
                Arc::new(UnavailableTransport::new(
                    "no message channel or privileged APIs",
                ))
            }
        };
        info!(kind = ?transport.kind(), "bridge transport selected");
        Self { transport }
    }

    pub fn kind(&self) -> TransportKind {
        self.transport.kind()
    }

    pub async fn call(&self, method: BridgeMethod, args: Vec<Value>) -> Result<Value, BridgeError> {
        self.transport.call(method.name(), args).await
    }

    /// `{key: value}` for the key, or `{}` when nothing is stored.
    pub async fn storage_get(&self, key: &str) -> Result<Value, BridgeError> {
        self.call(BridgeMethod::StorageGet, vec![Value::String(key.to_string())])
            .await
    }

    /// Store every entry of a `{key: value}` object.
    pub async fn storage_set(&self, data: Value) -> Result<(), BridgeError> {
        self.call(BridgeMethod::StorageSet, vec![data]).await.map(|_| ())
    }

    pub async fn send_message(&self, message: RuntimeMessage) -> Result<RuntimeResponse, BridgeError> {
        let raw = serde_json::to_value(&message).map_err(|e| BridgeError::Protocol(e.to_string()))?;
        let reply = self.call(BridgeMethod::SendMessage, vec![raw]).await?;
        decode::<RuntimeResponse>(reply)?.into_result()
    }

    pub async fn load_shortcuts(&self) -> Result<ShortcutCatalog, BridgeError> {
        decode(self.call(BridgeMethod::LoadShortcuts, Vec::new()).await?)
    }

    /// Current-window tabs, most recently used first.
    pub async fn get_tabs(&self) -> Result<Vec<TabInfo>, BridgeError> {
        decode(self.call(BridgeMethod::GetTabs, Vec::new()).await?)
    }

    pub async fn activate_tab(&self, tab_id: TabId) -> Result<(), BridgeError> {
        self.call(BridgeMethod::ActivateTab, vec![Value::from(tab_id.0)])
            .await
            .map(|_| ())
    }

    /// Open a URL-like query directly, anything else as a search.
    pub async fn create_tab(&self, query: &str) -> Result<(), BridgeError> {
        self.call(BridgeMethod::CreateTab, vec![Value::String(query.to_string())])
            .await
            .map(|_| ())
    }
}

fn decode<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, BridgeError> {
    serde_json::from_value(value).map_err(|e| BridgeError::Protocol(e.to_string()))
}
