use tokio::sync::broadcast;
use tracing::trace;

use crate::protocol::BridgeMessage;

const CHANNEL_CAPACITY: usize = 256;

/// The shared page-level message bus. Every subscriber sees every posted
/// message, including its own.
#[derive(Clone)]
pub struct MessageChannel {
    tx: broadcast::Sender<BridgeMessage>,
}

impl MessageChannel {
    pub fn new() -> Self {
        Self::with_capacity(CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Post a message. Returns how many listeners received it.
    pub fn post(&self, message: BridgeMessage) -> usize {
        trace!(?message, "post");
        self.tx.send(message).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BridgeMessage> {
        self.tx.subscribe()
    }

    pub fn listener_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for MessageChannel {
    fn default() -> Self {
        Self::new()
    }
}
