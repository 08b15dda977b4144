use std::sync::Arc;

use arc_bridge::{
    unknown_method, BridgeHandler, BridgeMethod, RuntimeMessage, RuntimePort, RuntimeResponse,
    ShortcutCatalog,
};
use arc_common::{BridgeError, TabId};
use arc_config::PersistenceBackend;
use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::debug;

/// Serves bridge methods on behalf of the untrusted page, using the
/// storage and runtime access only this side has.
pub struct ContentBridgeHandler {
    backend: Arc<dyn PersistenceBackend>,
    runtime: Arc<dyn RuntimePort>,
    catalog: ShortcutCatalog,
    tab: Option<TabId>,
}

impl ContentBridgeHandler {
    pub fn new(
        backend: Arc<dyn PersistenceBackend>,
        runtime: Arc<dyn RuntimePort>,
        catalog: ShortcutCatalog,
        tab: Option<TabId>,
    ) -> Self {
        Self {
            backend,
            runtime,
            catalog,
            tab,
        }
    }

    async fn storage_get(&self, args: &[Value]) -> Result<Value, BridgeError> {
        let key = string_arg(BridgeMethod::StorageGet, args)?;
        let stored = self.backend.read(key).await.map_err(remote)?;
        let mut out = Map::new();
        if let Some(value) = stored {
            out.insert(key.to_string(), value);
        }
        Ok(Value::Object(out))
    }

    async fn storage_set(&self, args: &[Value]) -> Result<Value, BridgeError> {
        let Some(Value::Object(entries)) = args.first() else {
            return Err(BridgeError::Remote(
                "storageSet expects an object of entries".into(),
            ));
        };
        for (key, value) in entries {
            self.backend
                .write(key, value.clone())
                .await
                .map_err(remote)?;
        }
        Ok(Value::Null)
    }

    async fn send_message(&self, args: &[Value]) -> Result<Value, BridgeError> {
        let raw = args
            .first()
            .cloned()
            .ok_or_else(|| missing(BridgeMethod::SendMessage))?;
        let message: RuntimeMessage =
            serde_json::from_value(raw).map_err(|e| BridgeError::Remote(e.to_string()))?;
        let response = self.runtime.send(message, self.tab).await?;
        to_value(&response)
    }

    async fn runtime(&self, message: RuntimeMessage) -> Result<RuntimeResponse, BridgeError> {
        self.runtime.send(message, self.tab).await?.into_result()
    }
}

#[async_trait]
impl BridgeHandler for ContentBridgeHandler {
    async fn handle(&self, method: &str, args: Vec<Value>) -> Result<Value, BridgeError> {
        let Some(parsed) = BridgeMethod::parse(method) else {
            return Err(unknown_method(method));
        };
        debug!(method = %parsed, args = args.len(), "bridge method");
        match parsed {
            BridgeMethod::StorageGet => self.storage_get(&args).await,
            BridgeMethod::StorageSet => self.storage_set(&args).await,
            BridgeMethod::SendMessage => self.send_message(&args).await,
            BridgeMethod::LoadShortcuts => to_value(&self.catalog),
            BridgeMethod::GetTabs => match self.runtime(RuntimeMessage::GetTabs).await? {
                RuntimeResponse::Tabs { tabs } => to_value(&tabs),
                other => Err(BridgeError::Protocol(format!(
                    "unexpected get-tabs reply: {other:?}"
                ))),
            },
            BridgeMethod::ActivateTab => {
                let tab_id = args
                    .first()
                    .and_then(Value::as_u64)
                    .and_then(|id| u32::try_from(id).ok())
                    .ok_or_else(|| missing(parsed))?;
                self.runtime(RuntimeMessage::ActivateTab {
                    tab_id: TabId(tab_id),
                })
                .await?;
                Ok(Value::Null)
            }
            BridgeMethod::CreateTab => {
                let url = string_arg(parsed, &args)?.to_string();
                self.runtime(RuntimeMessage::CreateTab { url }).await?;
                Ok(Value::Null)
            }
        }
    }
}

fn string_arg(method: BridgeMethod, args: &[Value]) -> Result<&str, BridgeError> {
    args.first()
        .and_then(Value::as_str)
        .ok_or_else(|| missing(method))
}

fn missing(method: BridgeMethod) -> BridgeError {
    BridgeError::Remote(format!("{method}: missing or invalid argument"))
}

fn remote(e: arc_common::SettingsError) -> BridgeError {
    BridgeError::Remote(e.to_string())
}

fn to_value<T: serde::Serialize>(value: &T) -> Result<Value, BridgeError> {
    serde_json::to_value(value).map_err(|e| BridgeError::Protocol(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use arc_common::TabInfo;
    use arc_config::MemoryBackend;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<(RuntimeMessage, Option<TabId>)>>,
    }

    #[async_trait]
    impl RuntimePort for Recorder {
        async fn send(
            &self,
            message: RuntimeMessage,
            sender: Option<TabId>,
        ) -> Result<RuntimeResponse, BridgeError> {
            let reply = match &message {
                RuntimeMessage::GetTabs => RuntimeResponse::Tabs {
                    tabs: vec![TabInfo {
                        id: TabId(5),
                        window_id: arc_common::WindowId(1),
                        title: "Docs".into(),
                        url: "https://docs.rs".into(),
                        fav_icon_url: None,
                        active: true,
                        pinned: false,
                        last_accessed: 9,
                    }],
                },
                RuntimeMessage::ActivateTab { tab_id } if tab_id.0 == 404 => {
                    RuntimeResponse::error("no such tab: 404")
                }
                _ => RuntimeResponse::ok(),
            };
            self.seen.lock().unwrap().push((message, sender));
            Ok(reply)
        }
    }

    fn handler() -> (ContentBridgeHandler, Arc<MemoryBackend>, Arc<Recorder>) {
        let backend = Arc::new(MemoryBackend::new());
        let runtime = Arc::new(Recorder::default());
        let catalog = ShortcutCatalog {
            shortcuts: Vec::new(),
            categories: Vec::new(),
        };
        let handler =
            ContentBridgeHandler::new(backend.clone(), runtime.clone(), catalog, Some(TabId(5)));
        (handler, backend, runtime)
    }

    #[tokio::test]
    async fn storage_get_wraps_value_under_key() {
        let (handler, _, _) = handler();
        assert_eq!(
            handler.handle("storageGet", vec![json!("k")]).await.unwrap(),
            json!({})
        );
        handler
            .handle("storageSet", vec![json!({ "k": { "a": 1 } })])
            .await
            .unwrap();
        assert_eq!(
            handler.handle("storageGet", vec![json!("k")]).await.unwrap(),
            json!({ "k": { "a": 1 } })
        );
    }

    #[tokio::test]
    async fn storage_errors_become_remote_errors() {
        let (handler, backend, _) = handler();
        backend.set_fail_writes(true);
        let err = handler
            .handle("storageSet", vec![json!({ "k": 1 })])
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::Remote(_)));
    }

    #[tokio::test]
    async fn send_message_forwards_with_sender_tab() {
        let (handler, _, runtime) = handler();
        let reply = handler
            .handle(
                "sendMessage",
                vec![json!({ "type": "perform", "actionId": "newTab" })],
            )
            .await
            .unwrap();
        assert_eq!(reply, json!({ "ok": true }));
        let seen = runtime.seen.lock().unwrap();
        assert_eq!(seen[0].1, Some(TabId(5)));
    }

    #[tokio::test]
    async fn get_tabs_returns_plain_list() {
        let (handler, _, _) = handler();
        let tabs = handler.handle("getTabs", vec![]).await.unwrap();
        assert_eq!(tabs[0]["title"], "Docs");
    }

    #[tokio::test]
    async fn activate_tab_surfaces_runtime_error() {
        let (handler, _, _) = handler();
        handler.handle("activateTab", vec![json!(5)]).await.unwrap();
        let err = handler.handle("activateTab", vec![json!(404)]).await.unwrap_err();
        assert_eq!(err, BridgeError::Remote("no such tab: 404".into()));
        assert!(handler.handle("activateTab", vec![json!("x")]).await.is_err());
    }

    #[tokio::test]
    async fn load_shortcuts_uses_wire_names() {
        let (handler, _, _) = handler();
        let value = handler.handle("loadShortcuts", vec![]).await.unwrap();
        assert!(value.get("SHORTCUTS").is_some());
        assert!(value.get("SHORTCUT_CATEGORIES").is_some());
    }

    #[tokio::test]
    async fn unknown_method_is_rejected() {
        let (handler, _, _) = handler();
        let err = handler.handle("eval", vec![]).await.unwrap_err();
        assert_eq!(err.to_string(), "Unknown bridge method: eval");
    }
}
