//! The mediator context: sits between the untrusted page and the
//! privileged side, owns the keyboard hook and serves bridge requests.

mod handler;
mod interceptor;
mod page;

pub use handler::ContentBridgeHandler;
pub use interceptor::KeyOutcome;
pub use page::SimulatedPage;
use page::{run_local_action, PageContext};

use std::sync::Arc;

use arc_bridge::{Mediator, MessageChannel, RuntimePort, TabMessage};
use arc_common::TabId;
use arc_config::{PersistenceBackend, Settings, SettingsDefaults, StorageChange, STORAGE_KEY};
use arc_platform::ShortcutRegistry;
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

pub struct ContentScript {
    tab: Option<TabId>,
    registry: Arc<ShortcutRegistry>,
    defaults: SettingsDefaults,
    settings: RwLock<Settings>,
    runtime: Arc<dyn RuntimePort>,
    page: Arc<dyn PageContext>,
    channel: MessageChannel,
}

impl ContentScript {
    pub fn new(
        tab: Option<TabId>,
        registry: Arc<ShortcutRegistry>,
        runtime: Arc<dyn RuntimePort>,
        page: Arc<dyn PageContext>,
        channel: MessageChannel,
    ) -> Self {
        let defaults = registry.settings_defaults();
        Self {
            tab,
            settings: RwLock::new(defaults.settings()),
            defaults,
            registry,
            runtime,
            page,
            channel,
        }
    }

    pub fn tab(&self) -> Option<TabId> {
        self.tab
    }

    pub async fn settings(&self) -> Settings {
        self.settings.read().await.clone()
    }

    /// Pull the stored document into the local copy. A failed read keeps
    /// the defaults.
    pub async fn load_settings(&self, backend: &dyn PersistenceBackend) -> Settings {
        let merged = match backend.read(STORAGE_KEY).await {
            Ok(raw) => self.defaults.merge(raw.as_ref()),
            Err(e) => {
                warn!(error = %e, "settings read failed, keys use defaults");
                self.defaults.settings()
            }
        };
        *self.settings.write().await = merged.clone();
        merged
    }

    /// Adopt a storage change for the settings key.
    pub async fn apply_change(&self, change: &StorageChange) {
        if change.key != STORAGE_KEY {
            return;
        }
        let merged = self.defaults.merge(change.new_value.as_ref());
        debug!(arc_mode = merged.arc_mode_enabled, "settings refreshed");
        *self.settings.write().await = merged;
    }

    /// Keep the local settings current and forward every change to the
    /// page as `storage-changed`.
    pub fn spawn_storage_listener(
        self: &Arc<Self>,
        mut rx: broadcast::Receiver<StorageChange>,
    ) -> JoinHandle<()> {
        let content = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(change) => {
                        content.apply_change(&change).await;
                        Mediator::forward_storage_changes(&content.channel, vec![change]);
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!("storage change stream lagged by {n} events");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }

    /// Run page actions relayed from the privileged side to this tab.
    pub fn spawn_tab_listener(
        self: &Arc<Self>,
        mut rx: broadcast::Receiver<(TabId, TabMessage)>,
    ) -> JoinHandle<()> {
        let content = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok((tab, TabMessage::PageAction { action_id })) => {
                        if Some(tab) == content.tab {
                            run_local_action(content.page.as_ref(), &action_id).await;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!("tab message stream lagged by {n} events");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}
