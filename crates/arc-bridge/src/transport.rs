use std::sync::Arc;

use arc_common::BridgeError;
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::client::RelayClient;
use crate::handler::BridgeHandler;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// Same handler, no message hop.
    InProcess,
    /// Through the shared message channel and the mediator.
    Relay,
    /// Nothing to talk to; every call fails fast.
    Unavailable,
}

/// How bridge calls leave the caller.
#[async_trait]
pub trait BridgeTransport: Send + Sync {
    async fn call(&self, method: &str, args: Vec<Value>) -> Result<Value, BridgeError>;

    fn kind(&self) -> TransportKind;
}

pub struct InProcessTransport {
    handler: Arc<dyn BridgeHandler>,
}

impl InProcessTransport {
    pub fn new(handler: Arc<dyn BridgeHandler>) -> Self {
        Self { handler }
    }
}

#[async_trait]
impl BridgeTransport for InProcessTransport {
    async fn call(&self, method: &str, args: Vec<Value>) -> Result<Value, BridgeError> {
        debug!(method, "in-process bridge call");
        // Errors are flattened to strings as they would be on the wire.
        self.handler
            .handle(method, args)
            .await
            .map_err(|e| match e {
                BridgeError::Remote(message) => BridgeError::Remote(message),
                other => BridgeError::Remote(other.to_string()),
            })
    }

    fn kind(&self) -> TransportKind {
        TransportKind::InProcess
    }
}

#[async_trait]
impl BridgeTransport for RelayClient {
    async fn call(&self, method: &str, args: Vec<Value>) -> Result<Value, BridgeError> {
        RelayClient::call(self, method, args).await
    }

    fn kind(&self) -> TransportKind {
        TransportKind::Relay
    }
}

pub struct UnavailableTransport {
    reason: String,
}

impl UnavailableTransport {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

#[async_trait]
impl BridgeTransport for UnavailableTransport {
    async fn call(&self, _method: &str, _args: Vec<Value>) -> Result<Value, BridgeError> {
        Err(BridgeError::Unavailable(self.reason.clone()))
    }

    fn kind(&self) -> TransportKind {
        TransportKind::Unavailable
    }
}
