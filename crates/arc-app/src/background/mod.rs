//! The privileged side: runtime message handling and action execution.

mod actions;
mod events;
mod navigation;
mod recent_tabs;
mod zoom;


use recent_tabs::RecentTabs;

use std::sync::Arc;

use arc_bridge::{PerformContext, RuntimeMessage, RuntimePort, RuntimeResponse};
use arc_common::{ActionError, BridgeError, TabId, TabInfo};
use arc_config::schema::ZoomConfig;
use arc_config::{ArcConfig, SettingsStore};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::host::{CreateTab, HostActionService, TabQuery, TabUpdate};
use crate::url::query_to_url;

const UNTITLED: &str = "Untitled";

pub struct Background {
    host: Arc<dyn HostActionService>,
    store: Arc<SettingsStore>,
    recent: RecentTabs,
    zoom: ZoomConfig,
    search_url: String,
}

impl Background {
    pub fn new(host: Arc<dyn HostActionService>, store: Arc<SettingsStore>, config: &ArcConfig) -> Self {
        Self {
            host,
            store,
            recent: RecentTabs::new(),
            zoom: config.zoom.clone(),
            search_url: config.overlay.search_url.clone(),
        }
    }

    pub fn store(&self) -> &Arc<SettingsStore> {
        &self.store
    }

    pub fn recent(&self) -> &RecentTabs {
        &self.recent
    }

    async fn active_tab(&self) -> Result<Option<TabInfo>, ActionError> {
        Ok(self
            .host
            .query_tabs(TabQuery::active_in_last_focused())
            .await?
            .into_iter()
            .next())
    }

    async fn target_tab(&self, context: &PerformContext) -> Result<Option<TabId>, ActionError> {
        match context.tab_id {
            Some(tab) => Ok(Some(tab)),
            None => Ok(self.active_tab().await?.map(|t| t.id)),
        }
    }

    /// Current-window tabs, most recently used first.
    pub async fn list_tabs(&self) -> Result<Vec<TabInfo>, ActionError> {
        let mut tabs = self.host.query_tabs(TabQuery::current_window()).await?;
        for tab in &mut tabs {
            if tab.title.is_empty() {
                tab.title = UNTITLED.to_string();
            }
            if tab.last_accessed == 0 {
                tab.last_accessed = u64::from(tab.id.0);
            }
        }
        tabs.sort_by(|a, b| b.last_accessed.cmp(&a.last_accessed));
        Ok(tabs)
    }

    async fn dispatch(&self, message: RuntimeMessage, sender: Option<TabId>) -> RuntimeResponse {
        match message {
            RuntimeMessage::Perform {
                action_id,
                mut context,
            } => {
                context.tab_id = sender.or(context.tab_id);
                match self.perform(&action_id, &context).await {
                    Ok(()) => RuntimeResponse::ok(),
                    Err(e) => {
                        warn!(action = %action_id, error = %e, "action failed");
                        RuntimeResponse::error(e.to_string())
                    }
                }
            }
            RuntimeMessage::GetSettings => RuntimeResponse::Settings {
                settings: self.store.get().await,
            },
            RuntimeMessage::SetArcMode { arc_mode } => match self.store.set_arc_mode(arc_mode).await {
                Ok(_) => RuntimeResponse::ok(),
                Err(e) => RuntimeResponse::error(e.to_string()),
            },
            RuntimeMessage::SetFeature {
                shortcut_id,
                enabled,
            } => match self.store.set_feature(&shortcut_id, enabled).await {
                Ok(_) => RuntimeResponse::ok(),
                Err(e) => RuntimeResponse::error(e.to_string()),
            },
            RuntimeMessage::GetTabs => match self.list_tabs().await {
                Ok(tabs) => RuntimeResponse::Tabs { tabs },
                Err(e) => RuntimeResponse::error(e.to_string()),
            },
            RuntimeMessage::ActivateTab { tab_id } => {
                match self.host.update_tab(tab_id, TabUpdate::activate()).await {
                    Ok(_) => RuntimeResponse::ok(),
                    Err(e) => RuntimeResponse::error(e.to_string()),
                }
            }
            RuntimeMessage::CreateTab { url } => {
                let url = query_to_url(&url, &self.search_url);
                match self.host.create_tab(CreateTab::url(url)).await {
                    Ok(_) => RuntimeResponse::ok(),
                    Err(e) => RuntimeResponse::error(e.to_string()),
                }
            }
        }
    }
}

#[async_trait]
impl RuntimePort for Background {
    async fn send(
        &self,
        message: RuntimeMessage,
        sender: Option<TabId>,
    ) -> Result<RuntimeResponse, BridgeError> {
        debug!(kind = message.kind(), sender = ?sender, "runtime message");
        Ok(self.dispatch(message, sender).await)
    }
}
