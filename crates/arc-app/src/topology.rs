//! Wires the privileged side, the mediator and the page overlay together
//! over a simulated host, the way a browser would load them.

use std::sync::Arc;
use std::time::Duration;

use arc_bridge::{
    Bridge, Capabilities, Mediator, MessageChannel, Readiness, RuntimeMessage, RuntimePort,
    ShortcutCatalog,
};
use arc_common::{ArcError, HostEvent};
use arc_config::{ArcConfig, PersistenceBackend, SettingsStore};
use arc_platform::{is_overlay_toggle, KeyEvent, Platform, ShortcutRegistry};
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::background::Background;
use crate::content::{ContentBridgeHandler, ContentScript, KeyOutcome, SimulatedPage};
use crate::host::SimulatedHost;
use crate::overlay::OverlayController;

/// Tabs the first window opens with.
pub const START_PAGES: &[(&str, &str)] = &[
    ("Rust", "https://www.rust-lang.org"),
    ("docs.rs", "https://docs.rs"),
    ("crates.io", "https://crates.io"),
];

/// Worker task turns given to relayed page work after each input.
const SETTLE_YIELDS: usize = 8;

/// Where one key press ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PressOutcome {
    Content(KeyOutcome),
    /// Consumed by the open overlay.
    Overlay,
}

pub struct Topology {
    platform: Platform,
    host: Arc<SimulatedHost>,
    store: Arc<SettingsStore>,
    background: Arc<Background>,
    content: Arc<ContentScript>,
    page: Arc<SimulatedPage>,
    overlay: Arc<OverlayController>,
    events: Mutex<broadcast::Receiver<HostEvent>>,
    ready_timeout: Duration,
    tasks: Vec<JoinHandle<()>>,
}

impl Topology {
    pub async fn start(
        config: &ArcConfig,
        platform: Platform,
        backend: Arc<dyn PersistenceBackend>,
    ) -> Result<Self, ArcError> {
        let request_timeout = Duration::from_millis(config.bridge.request_timeout_ms);
        let ready_timeout = Duration::from_millis(config.bridge.ready_timeout_ms);

        let host = Arc::new(SimulatedHost::new());
        let mut events = host.subscribe_events();
        host.open_window(START_PAGES);

        let registry = Arc::new(ShortcutRegistry::builtin(platform));
        let store = Arc::new(SettingsStore::new(
            Arc::clone(&backend),
            registry.settings_defaults(),
        ));
        let mut tasks = vec![store.watch_backend()];

        let background = Arc::new(Background::new(host.clone(), Arc::clone(&store), config));
        background.handle_event(HostEvent::Installed).await;
        background.drain_events(&mut events).await;

        let active = host.active_tab();
        let tab = active.as_ref().map(|t| t.id);
        let page = Arc::new(match &active {
            Some(t) => SimulatedPage::new(t.title.clone(), t.url.clone()),
            None => SimulatedPage::new("", ""),
        });

        let runtime: Arc<dyn RuntimePort> = background.clone();
        let channel = MessageChannel::new();
        let readiness = Readiness::new();

        let content = Arc::new(ContentScript::new(
            tab,
            Arc::clone(&registry),
            Arc::clone(&runtime),
            page.clone(),
            channel.clone(),
        ));
        content.load_settings(backend.as_ref()).await;
        tasks.push(content.spawn_storage_listener(backend.subscribe()));
        tasks.push(content.spawn_tab_listener(host.subscribe_tab_messages()));

        let bridge = Bridge::detect(
            Capabilities {
                privileged: None,
                channel: Some(channel.clone()),
            },
            request_timeout,
        );
        let overlay = Arc::new(OverlayController::new(bridge, readiness.clone(), ready_timeout));
        tasks.push(overlay.follow(&channel));

        let catalog = ShortcutCatalog {
            shortcuts: registry.all().to_vec(),
            categories: registry.categories(),
        };
        let handler = Arc::new(ContentBridgeHandler::new(backend, runtime, catalog, tab));
        tasks.push(Mediator::new(channel, handler, readiness).spawn());

        overlay.load().await?;
        info!(platform = platform.as_str(), tab = ?tab, "topology started");

        Ok(Self {
            platform,
            host,
            store,
            background,
            content,
            page,
            overlay,
            events: Mutex::new(events),
            ready_timeout,
            tasks,
        })
    }

    pub fn host(&self) -> &Arc<SimulatedHost> {
        &self.host
    }

    pub fn store(&self) -> &Arc<SettingsStore> {
        &self.store
    }

    pub fn content(&self) -> &Arc<ContentScript> {
        &self.content
    }

    pub fn page(&self) -> &Arc<SimulatedPage> {
        &self.page
    }

    pub fn overlay(&self) -> &Arc<OverlayController> {
        &self.overlay
    }

    /// Turn arc mode on or off the way the popup does, then wait for the
    /// mediator to pick the change up.
    pub async fn set_arc_mode(&self, enabled: bool) -> Result<(), ArcError> {
        self.background
            .send(RuntimeMessage::SetArcMode { arc_mode: enabled }, None)
            .await?
            .into_result()?;
        let deadline = tokio::time::Instant::now() + self.ready_timeout;
        while self.content.settings().await.arc_mode_enabled != enabled {
            if tokio::time::Instant::now() >= deadline {
                warn!(enabled, "mediator never saw the arc mode change");
                break;
            }
            tokio::task::yield_now().await;
        }
        Ok(())
    }

    /// Feed one combo such as `"meta+t"` through whichever context owns the
    /// keyboard right now.
    pub async fn press(&self, combo: &str) -> Result<PressOutcome, ArcError> {
        let event = KeyEvent::from_combo_str(combo)?;
        let outcome = self.press_event(&event).await;
        self.settle().await;
        Ok(outcome)
    }

    /// Type text into the overlay one character at a time.
    pub async fn type_text(&self, text: &str) {
        for c in text.chars() {
            self.press_event(&KeyEvent::new(c.to_string())).await;
        }
        self.settle().await;
    }

    pub fn summary(&self) -> String {
        self.host.summary()
    }

    async fn press_event(&self, event: &KeyEvent) -> PressOutcome {
        if self.overlay.is_open() && !is_overlay_toggle(event, self.platform) {
            self.overlay.handle_key(event).await;
            return PressOutcome::Overlay;
        }

        let mut open = self.overlay.subscribe_open();
        let was_open = *open.borrow_and_update();
        let outcome = self.content.on_key(event).await;
        if outcome == KeyOutcome::ToggleOverlay {
            let flipped = open.wait_for(|now| *now != was_open);
            if tokio::time::timeout(self.ready_timeout, flipped).await.is_err() {
                warn!("overlay did not react to toggle");
            }
        }
        PressOutcome::Content(outcome)
    }

    /// Let relayed work finish and feed host events to the privileged side.
    async fn settle(&self) {
        for _ in 0..SETTLE_YIELDS {
            tokio::task::yield_now().await;
        }
        let seen = self.background.drain_events(&mut *self.events.lock().await).await;
        debug!(events = seen, "host events drained");
    }
}

impl Drop for Topology {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}
