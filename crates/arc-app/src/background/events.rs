use std::sync::Arc;

use arc_common::HostEvent;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::Background;

impl Background {
    /// Track host lifecycle events.
    pub async fn handle_event(&self, event: HostEvent) {
        match event {
            HostEvent::TabActivated { tab_id, window_id } => {
                self.recent.on_activated(window_id, tab_id);
            }
            HostEvent::TabRemoved { tab_id, window_id } => {
                self.recent.on_removed(window_id, tab_id);
            }
            HostEvent::WindowFocused(window) => debug!(window = %window, "window focused"),
            HostEvent::Installed => {
                // first read persists the defaults
                let settings = self.store.get().await;
                info!(arc_mode = settings.arc_mode_enabled, "settings initialized");
            }
            HostEvent::Unknown => {}
        }
    }

    /// Apply every event already queued on `rx`. Returns how many were seen.
    pub async fn drain_events(&self, rx: &mut broadcast::Receiver<HostEvent>) -> usize {
        let mut seen = 0;
        loop {
            match rx.try_recv() {
                Ok(event) => {
                    seen += 1;
                    self.handle_event(event).await;
                }
                Err(TryRecvError::Lagged(n)) => warn!("host event stream lagged by {n} events"),
                Err(TryRecvError::Empty | TryRecvError::Closed) => return seen,
            }
        }
    }

    pub fn spawn_event_loop(self: &Arc<Self>, mut rx: broadcast::Receiver<HostEvent>) -> JoinHandle<()> {
        let background = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => background.handle_event(event).await,
                    Err(RecvError::Lagged(n)) => warn!("host event stream lagged by {n} events"),
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}
