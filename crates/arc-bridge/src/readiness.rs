use std::sync::Arc;
use std::time::Duration;

use arc_common::BridgeError;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::channel::MessageChannel;
use crate::protocol::BridgeMessage;

/// One-shot "the mediator is listening" flag.
#[derive(Clone)]
pub struct Readiness {
    tx: Arc<watch::Sender<bool>>,
}

impl Readiness {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn mark_ready(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_ready(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolve once ready, or fail with `Unavailable` after `timeout`.
    pub async fn wait(&self, timeout: Duration) -> Result<(), BridgeError> {
        let mut rx = self.tx.subscribe();
        let outcome = tokio::time::timeout(timeout, rx.wait_for(|ready| *ready))
            .await
            .map(|waited| waited.map(|_| ()));
        match outcome {
            Ok(Ok(())) => Ok(()),
            Ok(Err(_)) => Err(BridgeError::Unavailable("readiness signal dropped".into())),
            Err(_) => {
                warn!(after_ms = timeout.as_millis() as u64, "bridge not ready in time");
                Err(BridgeError::Unavailable(format!(
                    "bridge not ready after {}ms",
                    timeout.as_millis()
                )))
            }
        }
    }

    /// Mark ready when a `bridge-ready` message shows up on `channel`.
    /// This is how a context that cannot share the flag learns about it.
    pub fn follow(&self, channel: &MessageChannel) -> JoinHandle<()> {
        let readiness = self.clone();
        let mut rx = channel.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(BridgeMessage::Ready) => {
                        debug!("bridge-ready received");
                        readiness.mark_ready();
                        break;
                    }
                    Ok(_) | Err(RecvError::Lagged(_)) => {}
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}

impl Default for Readiness {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn wait_after_ready_returns_immediately() {
        let readiness = Readiness::new();
        readiness.mark_ready();
        assert!(readiness.is_ready());
        readiness.wait(Duration::from_millis(1)).await.unwrap();
    }

    #[tokio::test]
    async fn waiters_wake_on_ready() {
        let readiness = Readiness::new();
        let waiter = readiness.clone();
        let handle = tokio::spawn(async move { waiter.wait(Duration::from_secs(5)).await });
        tokio::task::yield_now().await;
        readiness.mark_ready();
        handle.await.unwrap().unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn wait_expires_as_unavailable() {
        let readiness = Readiness::new();
        let err = readiness.wait(Duration::from_millis(5000)).await.unwrap_err();
        assert_eq!(err, BridgeError::Unavailable("bridge not ready after 5000ms".into()));
    }

    #[tokio::test]
    async fn follows_ready_message() {
        let channel = MessageChannel::new();
        let readiness = Readiness::new();
        let handle = readiness.follow(&channel);
        channel.post(BridgeMessage::ToggleOverlay);
        channel.post(BridgeMessage::Ready);
        handle.await.unwrap();
        assert!(readiness.is_ready());
    }
}
