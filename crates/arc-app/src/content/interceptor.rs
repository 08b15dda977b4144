use arc_bridge::{Mediator, PerformContext, RuntimeMessage};
use arc_common::ActionId;
use arc_platform::{is_overlay_toggle, KeyEvent};
use tracing::{debug, warn};

use super::{run_local_action, ContentScript};

/// What the keyboard hook did with one key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Not handled; the page receives the key.
    PassThrough,
    ToggleOverlay,
    /// Handled in the page itself.
    Local(ActionId),
    /// Sent to the privileged side as `perform`.
    Dispatched { shortcut_id: String, action: ActionId },
}

impl KeyOutcome {
    /// Whether default handling of the key is suppressed.
    pub fn consumed(&self) -> bool {
        !matches!(self, KeyOutcome::PassThrough)
    }
}

impl ContentScript {
    /// Keydown hook. Inert unless arc mode is on.
    pub async fn on_key(&self, event: &KeyEvent) -> KeyOutcome {
        let settings = self.settings().await;
        if !settings.arc_mode_enabled {
            return KeyOutcome::PassThrough;
        }

        if is_overlay_toggle(event, self.registry.platform()) {
            Mediator::toggle_overlay(&self.channel);
            return KeyOutcome::ToggleOverlay;
        }

        let Some(shortcut) = self.registry.resolve_event(event, &settings) else {
            return KeyOutcome::PassThrough;
        };

        if shortcut.action.is_page_local() {
            run_local_action(self.page.as_ref(), &shortcut.action).await;
            return KeyOutcome::Local(shortcut.action.clone());
        }

        debug!(shortcut = %shortcut.id, action = %shortcut.action, "dispatching shortcut");
        let message = RuntimeMessage::Perform {
            action_id: shortcut.action.clone(),
            context: PerformContext::for_shortcut(shortcut),
        };
        match self.runtime.send(message, self.tab).await {
            Ok(response) => {
                if let Some(err) = response.into_result().err() {
                    warn!(shortcut = %shortcut.id, error = %err, "shortcut failed");
                }
            }
            Err(e) => warn!(shortcut = %shortcut.id, error = %e, "dispatch failed"),
        }
        KeyOutcome::Dispatched {
            shortcut_id: shortcut.id.clone(),
            action: shortcut.action.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::SimulatedPage;
    use arc_bridge::{BridgeMessage, MessageChannel, RuntimePort, RuntimeResponse};
    use arc_common::{BridgeError, TabId};
    use arc_config::{MemoryBackend, Settings, StorageChange, STORAGE_KEY};
    use arc_platform::{Platform, ShortcutRegistry};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Recorder {
        performed: Mutex<Vec<ActionId>>,
    }

    #[async_trait]
    impl RuntimePort for Recorder {
        async fn send(
            &self,
            message: RuntimeMessage,
            _sender: Option<TabId>,
        ) -> Result<RuntimeResponse, BridgeError> {
            if let RuntimeMessage::Perform { action_id, .. } = message {
                self.performed.lock().unwrap().push(action_id);
            }
            Ok(RuntimeResponse::ok())
        }
    }

    struct Fixture {
        content: ContentScript,
        runtime: Arc<Recorder>,
        page: Arc<SimulatedPage>,
        channel: MessageChannel,
    }

    async fn fixture(platform: Platform, stored: Option<serde_json::Value>) -> Fixture {
        let registry = Arc::new(ShortcutRegistry::builtin(platform));
        let runtime = Arc::new(Recorder::default());
        let page = Arc::new(SimulatedPage::new("Docs", "https://docs.rs"));
        let channel = MessageChannel::new();
        let content = ContentScript::new(
            Some(TabId(1)),
            registry,
            runtime.clone(),
            page.clone(),
            channel.clone(),
        );
        let backend = match stored {
            Some(value) => MemoryBackend::with_value(STORAGE_KEY, value),
            None => MemoryBackend::new(),
        };
        content.load_settings(&backend).await;
        Fixture {
            content,
            runtime,
            page,
            channel,
        }
    }

    fn arc_mode(features: serde_json::Value) -> Option<serde_json::Value> {
        Some(json!({ "arcMode": true, "features": features }))
    }

    fn key(combo: &str) -> KeyEvent {
        KeyEvent::from_combo_str(combo).unwrap()
    }

    #[tokio::test]
    async fn inert_without_arc_mode() {
        let f = fixture(Platform::Mac, None).await;
        assert_eq!(f.content.on_key(&key("meta+t")).await, KeyOutcome::PassThrough);
        assert!(f.runtime.performed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn dispatches_privileged_shortcut() {
        let f = fixture(Platform::Mac, arc_mode(json!({}))).await;
        let outcome = f.content.on_key(&key("meta+t")).await;
        assert_eq!(
            outcome,
            KeyOutcome::Dispatched {
                shortcut_id: "newTab".into(),
                action: ActionId::NewTab
            }
        );
        assert!(outcome.consumed());
        assert_eq!(*f.runtime.performed.lock().unwrap(), vec![ActionId::NewTab]);
    }

    #[tokio::test]
    async fn page_local_actions_stay_in_page() {
        let f = fixture(Platform::Linux, arc_mode(json!({}))).await;
        assert_eq!(
            f.content.on_key(&key("control+f")).await,
            KeyOutcome::Local(ActionId::Find)
        );
        assert_eq!(f.page.find_opened(), 1);
        assert!(f.runtime.performed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn overlay_toggle_posts_message() {
        let f = fixture(Platform::Mac, arc_mode(json!({}))).await;
        let mut rx = f.channel.subscribe();
        assert_eq!(f.content.on_key(&key("meta+k")).await, KeyOutcome::ToggleOverlay);
        assert_eq!(rx.recv().await.unwrap(), BridgeMessage::ToggleOverlay);
    }

    #[tokio::test]
    async fn overlay_toggle_requires_exact_modifiers() {
        let f = fixture(Platform::Mac, arc_mode(json!({}))).await;
        assert_ne!(
            f.content.on_key(&key("meta+shift+k")).await,
            KeyOutcome::ToggleOverlay
        );
    }

    #[tokio::test]
    async fn disabled_shortcut_passes_through() {
        let f = fixture(Platform::Mac, arc_mode(json!({ "newTab": false }))).await;
        assert_eq!(f.content.on_key(&key("meta+t")).await, KeyOutcome::PassThrough);
    }

    #[tokio::test]
    async fn unbound_combo_passes_through() {
        let f = fixture(Platform::Mac, arc_mode(json!({}))).await;
        assert_eq!(
            f.content.on_key(&key("meta+alt+shift+j")).await,
            KeyOutcome::PassThrough
        );
    }

    #[tokio::test]
    async fn storage_change_refreshes_gate() {
        let f = fixture(Platform::Mac, None).await;
        f.content
            .apply_change(&StorageChange {
                key: STORAGE_KEY.into(),
                old_value: None,
                new_value: arc_mode(json!({})),
            })
            .await;
        let settings: Settings = f.content.settings().await;
        assert!(settings.arc_mode_enabled);
        assert!(f.content.on_key(&key("meta+t")).await.consumed());
    }
}
