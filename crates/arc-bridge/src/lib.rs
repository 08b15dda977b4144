//! Cross-context dispatch for Arc Command.
//!
//! Three contexts talk here: the privileged side that owns host APIs, the
//! mediator that can reach it, and the untrusted page that can only post
//! messages. [`Bridge`] gives every caller the same async API whichever
//! transport was picked at startup.

pub mod bridge;
pub mod channel;
pub mod client;
pub mod handler;
pub mod mediator;
pub mod pending;
pub mod protocol;
pub mod readiness;
pub mod runtime;
pub mod transport;

pub use bridge::{Bridge, Capabilities, ShortcutCatalog};
pub use channel::MessageChannel;
pub use client::RelayClient;
pub use handler::{unknown_method, BridgeHandler};
pub use mediator::Mediator;
pub use pending::{PendingBridgeRequest, PendingTable};
pub use protocol::{BridgeMessage, BridgeMethod};
pub use readiness::Readiness;
pub use runtime::{PerformContext, RuntimeMessage, RuntimePort, RuntimeResponse, TabMessage};
pub use transport::{BridgeTransport, InProcessTransport, TransportKind, UnavailableTransport};

/// Default round-trip deadline for one bridge call.
pub const DEFAULT_REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_millis(5000);

/// Default wait for the mediator's readiness announcement.
pub const DEFAULT_READY_TIMEOUT: std::time::Duration = std::time::Duration::from_millis(5000);
