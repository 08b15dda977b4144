use arc_bridge::{PerformContext, TabMessage};
use arc_common::{ActionError, ActionId, Notification, TabId};
use tracing::{debug, info, warn};

use super::zoom::next_zoom;
use super::Background;
use crate::host::{CreateTab, CreateWindow, TabUpdate, NEW_TAB_URL};

pub const HISTORY_URL: &str = "chrome://history";
pub const LITTLE_ARC_SIZE: (u32, u32) = (980, 640);

impl Background {
    /// Execute one action against the host.
    ///
    /// `unsupported-*` actions only raise their notice and unknown ids are
    /// ignored. Everything else resolves its target tab first: the
    /// context's tab, or the active tab of the last focused window.
    pub async fn perform(&self, action: &ActionId, context: &PerformContext) -> Result<(), ActionError> {
        match action {
            ActionId::Unsupported(reason) => {
                info!(action = %action, "action has no host equivalent");
                return self.host.notify(Notification::unsupported(reason)).await;
            }
            ActionId::Unknown(name) => {
                debug!(action = %name, "unknown action ignored");
                return Ok(());
            }
            _ => {}
        }

        let target = self.target_tab(context).await?;
        debug!(action = %action, target = ?target, "performing action");

        match action {
            ActionId::NewTab => {
                self.host.create_tab(CreateTab::default()).await?;
            }
            ActionId::CloseTab => {
                if let Some(tab) = target {
                    self.host.remove_tabs(&[tab]).await?;
                }
            }
            ActionId::ReopenTab => self.host.restore_session().await?,
            ActionId::PinTab => {
                if let Some(tab) = target {
                    let current = self.host.get_tab(tab).await?;
                    self.host
                        .update_tab(tab, TabUpdate::pin(!current.pinned))
                        .await?;
                }
            }
            ActionId::ClearUnpinned => self.clear_unpinned().await?,

            ActionId::NewWindow => {
                self.host.create_window(CreateWindow::normal()).await?;
            }
            ActionId::NewIncognito => {
                self.host.create_window(CreateWindow::incognito()).await?;
            }
            ActionId::LittleArc => {
                let (width, height) = LITTLE_ARC_SIZE;
                self.host
                    .create_window(CreateWindow::popup(NEW_TAB_URL, width, height))
                    .await?;
            }

            ActionId::GoToTab => {
                if let Some(index) = context.tab_index() {
                    self.activate_tab_index(index).await?;
                }
            }
            ActionId::GoToLastTab => self.activate_last_tab().await?,
            ActionId::NextTab => self.cycle_tabs(1).await?,
            ActionId::PreviousTab => self.cycle_tabs(-1).await?,
            ActionId::NextWindow => self.cycle_windows(1).await?,
            ActionId::PreviousWindow => self.cycle_windows(-1).await?,
            ActionId::FocusSpace => {
                if let Some(index) = context.space_index() {
                    self.focus_space(index).await?;
                }
            }
            ActionId::ToggleRecent => self.toggle_recent().await?,

            ActionId::HistoryBack => {
                if let Some(tab) = target {
                    self.host.go_back(tab).await?;
                }
            }
            ActionId::HistoryForward => {
                if let Some(tab) = target {
                    self.host.go_forward(tab).await?;
                }
            }
            ActionId::OpenHistory => {
                self.host.create_tab(CreateTab::url(HISTORY_URL)).await?;
            }
            ActionId::Reload => {
                if let Some(tab) = target {
                    self.host.reload(tab).await?;
                }
            }

            ActionId::ZoomIn => self.adjust_zoom(target, self.zoom.step).await?,
            ActionId::ZoomOut => self.adjust_zoom(target, -self.zoom.step).await?,
            ActionId::ResetZoom => {
                if let Some(tab) = target {
                    self.host.set_zoom(tab, 1.0).await?;
                }
            }

            ActionId::Find | ActionId::CopyUrl | ActionId::CopyUrlMarkdown => {
                self.relay_page_action(target, action.clone()).await;
            }

            ActionId::Unsupported(_) | ActionId::Unknown(_) => {}
        }
        Ok(())
    }

    async fn adjust_zoom(&self, target: Option<TabId>, delta: f64) -> Result<(), ActionError> {
        let Some(tab) = target else {
            return Ok(());
        };
        let current = self.host.get_zoom(tab).await?;
        let next = next_zoom(current, delta, &self.zoom);
        debug!(tab = %tab, from = current, to = next, "zoom");
        self.host.set_zoom(tab, next).await
    }

    /// Page-local actions run in the tab itself. A tab with nothing
    /// listening is not an error for the caller.
    async fn relay_page_action(&self, target: Option<TabId>, action_id: ActionId) {
        let Some(tab) = target else {
            return;
        };
        if let Err(e) = self
            .host
            .relay_to_tab(tab, TabMessage::PageAction { action_id })
            .await
        {
            warn!(tab = %tab, error = %e, "page action relay failed");
        }
    }
}
