use std::time::Duration;

use arc_common::{new_correlation_id, BridgeError};
use serde_json::Value;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::channel::MessageChannel;
use crate::pending::PendingTable;
use crate::protocol::BridgeMessage;

/// Untrusted-side caller: posts `bridge-request` messages and waits for
/// the matching `bridge-response`.
#[derive(Clone)]
pub struct RelayClient {
    channel: MessageChannel,
    pending: PendingTable,
    timeout: Duration,
}

impl RelayClient {
    pub fn new(channel: MessageChannel, timeout: Duration) -> Self {
        Self {
            channel,
            pending: PendingTable::new(),
            timeout,
        }
    }

    pub fn pending(&self) -> &PendingTable {
        &self.pending
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// One round trip. Late or duplicate responses for this id find no
    /// listener once this returns and are dropped by the channel.
    pub async fn call(&self, method: &str, args: Vec<Value>) -> Result<Value, BridgeError> {
        let guard = self.pending.register(method, new_correlation_id);
        let id = guard.id().to_string();

        // Listen before posting so a fast response cannot be missed.
        let mut rx = self.channel.subscribe();
        self.channel.post(BridgeMessage::Request {
            id: id.clone(),
            method: method.to_string(),
            args,
        });
        debug!(id = %id, method, "bridge request posted");

        let wait = async {
            loop {
                match rx.recv().await {
                    Ok(BridgeMessage::Response {
                        id: rid,
                        result,
                        error,
                    }) if rid == id => {
                        return match error {
                            Some(message) => Err(BridgeError::Remote(message)),
                            None => Ok(result.unwrap_or(Value::Null)),
                        };
                    }
                    Ok(_) => continue,
                    Err(RecvError::Lagged(n)) => {
                        warn!(id = %id, skipped = n, "bridge listener lagged");
                    }
                    Err(RecvError::Closed) => {
                        return Err(BridgeError::Unavailable("message channel closed".into()));
                    }
                }
            }
        };

        let outcome = match tokio::time::timeout(self.timeout, wait).await {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!(id = %id, method, "bridge request timed out");
                Err(BridgeError::Timeout {
                    method: method.to_string(),
                    after: self.timeout,
                })
            }
        };
        drop(guard);
        outcome
    }
}
