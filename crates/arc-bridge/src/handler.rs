use arc_common::BridgeError;
use async_trait::async_trait;
use serde_json::Value;

/// Answers bridge requests by method name.
///
/// The mediator and the in-process transport both drive the same handler,
/// so a call behaves identically on either path.
#[async_trait]
pub trait BridgeHandler: Send + Sync {
    async fn handle(&self, method: &str, args: Vec<Value>) -> Result<Value, BridgeError>;
}

/// Error returned for a method the handler does not implement.
pub fn unknown_method(method: &str) -> BridgeError {
    BridgeError::Remote(format!("Unknown bridge method: {method}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_method_message() {
        assert_eq!(unknown_method("eval").to_string(), "Unknown bridge method: eval");
    }
}
