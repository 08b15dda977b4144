pub mod actions;
pub mod errors;
pub mod events;
pub mod id;
pub mod notifications;
pub mod types;

pub use actions::{ActionId, UnsupportedReason};
pub use errors::{ActionError, ArcError, BridgeError, ConfigError, PlatformError, SettingsError};
pub use events::{EventBus, HostEvent};
pub use id::new_correlation_id;
pub use notifications::{Notification, NotificationLevel, NotificationQueue};
pub use types::{TabId, TabInfo, WindowId, WindowInfo, WindowKind};

pub type Result<T> = std::result::Result<T, ArcError>;
