use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use arc_bridge::{
    Bridge, BridgeMessage, MessageChannel, PerformContext, Readiness, RuntimeMessage,
    TransportKind,
};
use arc_common::BridgeError;
use arc_config::{StorageChange, STORAGE_KEY};
use arc_platform::{KeyEvent, ShortcutCategory};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::state::OverlayState;
use super::types::{OverlayCommand, OverlayMode, OverlayStatus};

/// Drives an [`OverlayState`] from keystrokes and talks to the bridge.
pub struct OverlayController {
    bridge: Bridge,
    readiness: Readiness,
    ready_timeout: Duration,
    state: Mutex<Option<OverlayState>>,
    status: watch::Sender<OverlayStatus>,
    open: watch::Sender<bool>,
}

impl OverlayController {
    pub fn new(bridge: Bridge, readiness: Readiness, ready_timeout: Duration) -> Self {
        let (status, _) = watch::channel(OverlayStatus::Loading);
        let (open, _) = watch::channel(false);
        Self {
            bridge,
            readiness,
            ready_timeout,
            state: Mutex::new(None),
            status,
            open,
        }
    }

    pub fn status(&self) -> OverlayStatus {
        self.status.borrow().clone()
    }

    pub fn is_open(&self) -> bool {
        *self.open.borrow()
    }

    pub fn subscribe_open(&self) -> watch::Receiver<bool> {
        self.open.subscribe()
    }

    /// Fetch the shortcut table and stored settings once the bridge is ready.
    ///
    /// Any failure leaves the overlay in a terminal `Error` status.
    pub async fn load(&self) -> Result<(), BridgeError> {
        match self.try_load().await {
            Ok(state) => {
                info!(shortcuts = state.visible_len(), "overlay loaded");
                *self.lock() = Some(state);
                self.status.send_replace(OverlayStatus::Ready);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "overlay failed to load");
                self.status.send_replace(OverlayStatus::Error(e.to_string()));
                Err(e)
            }
        }
    }

    async fn try_load(&self) -> Result<OverlayState, BridgeError> {
        if self.bridge.kind() == TransportKind::Unavailable {
            // surface the transport's own reason
            self.bridge.storage_get(STORAGE_KEY).await?;
        }
        self.readiness.wait(self.ready_timeout).await?;

        let catalog = self.bridge.load_shortcuts().await?;
        let stored = self.bridge.storage_get(STORAGE_KEY).await?;
        Ok(OverlayState::new(catalog.shortcuts, stored.get(STORAGE_KEY)))
    }

    pub async fn open(&self) {
        let mode = self.with_state(|s| {
            s.set_query("");
            s.mode()
        });
        self.open.send_replace(true);
        if mode == Some(OverlayMode::Tabs) {
            self.refresh_tabs().await;
        }
    }

    pub fn close(&self) {
        self.open.send_replace(false);
    }

    pub async fn toggle(&self) {
        if self.is_open() {
            self.close();
        } else {
            self.open().await;
        }
    }

    pub async fn set_mode(&self, mode: OverlayMode) {
        self.with_state(|s| s.set_mode(mode));
        if mode == OverlayMode::Tabs {
            self.refresh_tabs().await;
        }
    }

    pub fn set_category(&self, category: Option<ShortcutCategory>) {
        self.with_state(|s| s.set_category(category));
    }

    pub async fn refresh_tabs(&self) {
        if self.status() != OverlayStatus::Ready {
            return;
        }
        match self.bridge.get_tabs().await {
            Ok(tabs) => {
                debug!(count = tabs.len(), "overlay tabs refreshed");
                self.with_state(|s| s.set_tabs(tabs));
            }
            Err(e) => warn!(error = %e, "failed to load tabs"),
        }
    }

    /// Consume one keystroke while open. Escape always closes; everything
    /// else is ignored until the overlay has loaded.
    pub async fn handle_key(&self, event: &KeyEvent) {
        if event.key == "Escape" {
            self.close();
            return;
        }
        if self.status() != OverlayStatus::Ready {
            return;
        }

        match event.key.as_str() {
            "ArrowDown" => {
                self.with_state(|s| s.move_down());
            }
            "ArrowUp" => {
                self.with_state(|s| s.move_up());
            }
            "Backspace" => {
                self.with_state(|s| s.backspace());
            }
            "Tab" => {
                if let Some(mode) = self.with_state(|s| s.mode()) {
                    self.set_mode(mode.toggled()).await;
                }
            }
            "Enter" => {
                if let Some(command) = self.with_state(|s| s.confirm()).flatten() {
                    self.execute(command).await;
                    self.close();
                }
            }
            key if !event.meta && !event.ctrl && key.chars().count() == 1 => {
                if let Some(c) = key.chars().next() {
                    self.with_state(|s| s.append_char(c));
                }
            }
            _ => {}
        }
    }

    /// Re-derive enablement when the settings document changed.
    pub fn apply_storage_changes(&self, changes: &[StorageChange]) {
        for change in changes.iter().filter(|c| c.key == STORAGE_KEY) {
            self.with_state(|s| s.apply_stored(change.new_value.as_ref()));
        }
    }

    /// React to toggle and storage-change messages posted by the mediator.
    pub fn follow(self: &Arc<Self>, channel: &MessageChannel) -> JoinHandle<()> {
        let controller = Arc::clone(self);
        let mut rx = channel.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(BridgeMessage::ToggleOverlay) => controller.toggle().await,
                    Ok(BridgeMessage::StorageChanged { changes }) => {
                        controller.apply_storage_changes(&changes);
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(n)) => warn!(skipped = n, "overlay lagged behind channel"),
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }

    /// Plain-text rendering of what the overlay currently shows.
    pub fn render(&self) -> String {
        let status = self.status();
        if let OverlayStatus::Error(message) = status {
            return format!("error: {message}");
        }
        let guard = self.lock();
        let Some(state) = guard.as_ref() else {
            return "loading".into();
        };

        let mut lines = vec![format!("{:?} > {}", state.mode(), state.query())];
        let entries: Vec<String> = match state.mode() {
            OverlayMode::Shortcuts => state
                .visible_shortcuts()
                .into_iter()
                .map(|s| {
                    let off = if state.is_enabled(s) { "" } else { " (disabled)" };
                    format!("{}{off}", s.label)
                })
                .collect(),
            OverlayMode::Tabs => state
                .visible_tabs()
                .into_iter()
                .map(|t| format!("{} <{}>", t.title, t.url))
                .collect(),
        };
        for (i, entry) in entries.into_iter().enumerate() {
            let marker = if i == state.highlight() { '>' } else { ' ' };
            lines.push(format!("{marker} {entry}"));
        }
        lines.join("\n")
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&mut OverlayState) -> R) -> Option<R> {
        self.lock().as_mut().map(f)
    }

    async fn execute(&self, command: OverlayCommand) {
        let result = match &command {
            OverlayCommand::Perform(shortcut) => self
                .bridge
                .send_message(RuntimeMessage::Perform {
                    action_id: shortcut.action.clone(),
                    context: PerformContext::for_shortcut(shortcut),
                })
                .await
                .map(|_| ()),
            OverlayCommand::ActivateTab(tab_id) => self.bridge.activate_tab(*tab_id).await,
            OverlayCommand::OpenQuery(query) => self.bridge.create_tab(query).await,
        };
        if let Err(e) = result {
            warn!(command = ?command, error = %e, "overlay command failed");
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<OverlayState>> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arc_bridge::{
        BridgeHandler, BridgeMethod, InProcessTransport, ShortcutCatalog, UnavailableTransport,
    };
    use arc_common::{TabId, TabInfo, WindowId};
    use arc_platform::{builtin_shortcuts, Platform, ShortcutRegistry};
    use async_trait::async_trait;
    use serde_json::{json, Value};

    struct FakeHandler {
        stored: Value,
        tabs: Vec<TabInfo>,
        calls: Mutex<Vec<(String, Vec<Value>)>>,
    }

    impl FakeHandler {
        fn new(stored: Value) -> Arc<Self> {
            Arc::new(Self {
                stored,
                tabs: vec![
                    tab(1, "Rust docs", "https://docs.rs"),
                    tab(2, "Crates", "https://crates.io"),
                ],
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self, method: &str) -> Vec<Vec<Value>> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|(m, _)| m == method)
                .map(|(_, args)| args.clone())
                .collect()
        }
    }

    #[async_trait]
    impl BridgeHandler for FakeHandler {
        async fn handle(&self, method: &str, args: Vec<Value>) -> Result<Value, BridgeError> {
            self.calls.lock().unwrap().push((method.to_string(), args));
            match BridgeMethod::parse(method) {
                Some(BridgeMethod::LoadShortcuts) => {
                    let registry = ShortcutRegistry::builtin(Platform::Mac);
                    Ok(serde_json::to_value(ShortcutCatalog {
                        shortcuts: builtin_shortcuts().to_vec(),
                        categories: registry.categories(),
                    })
                    .unwrap())
                }
                Some(BridgeMethod::StorageGet) => {
                    let mut found = serde_json::Map::new();
                    found.insert(STORAGE_KEY.to_string(), self.stored.clone());
                    Ok(Value::Object(found))
                }
                Some(BridgeMethod::GetTabs) => Ok(serde_json::to_value(&self.tabs).unwrap()),
                Some(BridgeMethod::SendMessage) => Ok(json!({ "ok": true })),
                Some(_) => Ok(Value::Null),
                None => Err(arc_bridge::unknown_method(method)),
            }
        }
    }

    fn tab(id: u32, title: &str, url: &str) -> TabInfo {
        TabInfo {
            id: TabId(id),
            window_id: WindowId(1),
            title: title.into(),
            url: url.into(),
            fav_icon_url: None,
            active: false,
            pinned: false,
            last_accessed: 0,
        }
    }

    fn ready() -> Readiness {
        let readiness = Readiness::new();
        readiness.mark_ready();
        readiness
    }

    fn controller(handler: Arc<FakeHandler>) -> OverlayController {
        let bridge = Bridge::new(Arc::new(InProcessTransport::new(handler)));
        OverlayController::new(bridge, ready(), Duration::from_millis(5000))
    }

    async fn type_text(c: &OverlayController, text: &str) {
        for ch in text.chars() {
            c.handle_key(&KeyEvent::new(ch.to_string())).await;
        }
    }

    #[tokio::test]
    async fn load_reaches_ready() {
        let c = controller(FakeHandler::new(json!({ "arcMode": true })));
        assert_eq!(c.status(), OverlayStatus::Loading);
        c.load().await.unwrap();
        assert_eq!(c.status(), OverlayStatus::Ready);
        assert!(c.with_state(|s| s.settings().arc_mode_enabled).unwrap());
    }

    #[tokio::test]
    async fn unavailable_bridge_is_terminal_error() {
        let bridge = Bridge::new(Arc::new(UnavailableTransport::new("no channel")));
        let c = OverlayController::new(bridge, ready(), Duration::from_millis(5000));
        assert!(c.load().await.is_err());
        assert!(matches!(c.status(), OverlayStatus::Error(m) if m.contains("no channel")));
        assert!(c.render().starts_with("error:"));
    }

    #[tokio::test(start_paused = true)]
    async fn readiness_timeout_is_error() {
        let bridge = Bridge::new(Arc::new(InProcessTransport::new(FakeHandler::new(json!({})))));
        let c = OverlayController::new(bridge, Readiness::new(), Duration::from_millis(5000));
        let err = c.load().await.unwrap_err();
        assert!(matches!(err, BridgeError::Unavailable(_)));
        assert!(matches!(c.status(), OverlayStatus::Error(_)));
    }

    #[tokio::test]
    async fn enter_performs_highlighted_shortcut_and_closes() {
        let handler = FakeHandler::new(json!({}));
        let c = controller(handler.clone());
        c.load().await.unwrap();
        c.open().await;
        type_text(&c, "zoom in").await;
        c.handle_key(&KeyEvent::new("Enter")).await;

        let sent = handler.calls("sendMessage");
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0][0]["type"], "perform");
        assert_eq!(sent[0][0]["actionId"], "zoomIn");
        assert_eq!(sent[0][0]["shortcutId"], "zoomIn");
        assert!(!c.is_open());
    }

    #[tokio::test]
    async fn enter_on_disabled_shortcut_stays_open() {
        let handler = FakeHandler::new(json!({ "features": { "zoomIn": false } }));
        let c = controller(handler.clone());
        c.load().await.unwrap();
        c.open().await;
        type_text(&c, "zoom in").await;
        c.handle_key(&KeyEvent::new("Enter")).await;
        assert!(handler.calls("sendMessage").is_empty());
        assert!(c.is_open());
        assert!(c.render().contains("(disabled)"));
    }

    #[tokio::test]
    async fn storage_change_refreshes_enablement() {
        let handler = FakeHandler::new(json!({ "features": { "zoomIn": false } }));
        let c = controller(handler.clone());
        c.load().await.unwrap();
        c.apply_storage_changes(&[StorageChange {
            key: STORAGE_KEY.into(),
            old_value: None,
            new_value: Some(json!({ "features": { "zoomIn": true } })),
        }]);
        c.open().await;
        type_text(&c, "zoom in").await;
        c.handle_key(&KeyEvent::new("Enter")).await;
        assert_eq!(handler.calls("sendMessage").len(), 1);
    }

    #[tokio::test]
    async fn tab_mode_activates_or_opens_query() {
        let handler = FakeHandler::new(json!({}));
        let c = controller(handler.clone());
        c.load().await.unwrap();
        c.open().await;
        c.handle_key(&KeyEvent::new("Tab")).await;
        assert_eq!(c.with_state(|s| s.mode()), Some(OverlayMode::Tabs));
        assert_eq!(handler.calls("getTabs").len(), 1);

        type_text(&c, "crates").await;
        c.handle_key(&KeyEvent::new("Enter")).await;
        assert_eq!(handler.calls("activateTab"), vec![vec![json!(2)]]);

        c.open().await;
        type_text(&c, "tokio").await;
        c.handle_key(&KeyEvent::new("Enter")).await;
        assert_eq!(handler.calls("createTab"), vec![vec![json!("tokio")]]);
    }

    #[tokio::test]
    async fn arrows_clamp_and_escape_closes() {
        let c = controller(FakeHandler::new(json!({})));
        c.load().await.unwrap();
        c.open().await;
        c.handle_key(&KeyEvent::new("ArrowUp")).await;
        assert_eq!(c.with_state(|s| s.highlight()), Some(0));
        c.handle_key(&KeyEvent::new("ArrowDown")).await;
        assert_eq!(c.with_state(|s| s.highlight()), Some(1));
        c.handle_key(&KeyEvent::new("Escape")).await;
        assert!(!c.is_open());
    }

    #[tokio::test]
    async fn follow_toggles_on_channel_message() {
        let channel = MessageChannel::new();
        let c = Arc::new(controller(FakeHandler::new(json!({}))));
        c.load().await.unwrap();
        let _task = c.follow(&channel);
        let mut open = c.subscribe_open();

        channel.post(BridgeMessage::ToggleOverlay);
        open.wait_for(|o| *o).await.unwrap();
        channel.post(BridgeMessage::ToggleOverlay);
        open.wait_for(|o| !*o).await.unwrap();
    }
}
