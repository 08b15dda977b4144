use serde::{Deserialize, Serialize};

/// Cross-context bridge timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Deadline for one request/response round trip, in milliseconds.
    pub request_timeout_ms: u64,
    /// How long dependents wait for the mediator's readiness signal.
    pub ready_timeout_ms: u64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 5000,
            ready_timeout_ms: 5000,
        }
    }
}
