use std::sync::Arc;

use arc_config::StorageChange;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::channel::MessageChannel;
use crate::handler::BridgeHandler;
use crate::protocol::BridgeMessage;
use crate::readiness::Readiness;

/// Serves `bridge-request` messages from the channel with a handler.
///
/// Each request runs on its own task and gets exactly one
/// `bridge-response`, so slow methods never hold up fast ones.
pub struct Mediator {
    channel: MessageChannel,
    handler: Arc<dyn BridgeHandler>,
    readiness: Readiness,
}

impl Mediator {
    pub fn new(channel: MessageChannel, handler: Arc<dyn BridgeHandler>, readiness: Readiness) -> Self {
        Self {
            channel,
            handler,
            readiness,
        }
    }

    /// Start serving. Readiness is announced only after the listener is in
    /// place, so no request posted after the announcement is missed.
    pub fn spawn(self) -> JoinHandle<()> {
        let mut rx = self.channel.subscribe();
        self.readiness.mark_ready();
        self.channel.post(BridgeMessage::Ready);
        info!("mediator ready");

        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(BridgeMessage::Request { id, method, args }) => {
                        let handler = Arc::clone(&self.handler);
                        let channel = self.channel.clone();
                        tokio::spawn(async move {
                            debug!(id = %id, method = %method, "serving bridge request");
                            let response = match handler.handle(&method, args).await {
                                Ok(result) => BridgeMessage::ok(id, result),
                                Err(e) => {
                                    debug!(method = %method, error = %e, "bridge request failed");
                                    BridgeMessage::err(id, e.to_string())
                                }
                            };
                            channel.post(response);
                        });
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(n)) => {
                        warn!(skipped = n, "mediator lagged, requests dropped");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }

    /// Forward storage changes to the page.
    pub fn forward_storage_changes(channel: &MessageChannel, changes: Vec<StorageChange>) {
        if changes.is_empty() {
            return;
        }
        channel.post(BridgeMessage::StorageChanged { changes });
    }

    pub fn toggle_overlay(channel: &MessageChannel) {
        channel.post(BridgeMessage::ToggleOverlay);
    }
}
