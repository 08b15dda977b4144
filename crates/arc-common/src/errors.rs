use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),

    #[error("config watch error: {0}")]
    WatchError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("invalid combo: {0}")]
    InvalidCombo(String),

    #[error("unknown platform: {0}")]
    UnknownPlatform(String),

    #[error("not supported: {0}")]
    NotSupported(String),
}

/// Failures of the persistence backend behind the settings store.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SettingsError {
    #[error("settings persistence error: {0}")]
    Persistence(String),

    #[error("settings serialization error: {0}")]
    Serialization(String),
}

/// Failures surfaced by the cross-context bridge.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BridgeError {
    /// No response arrived within the deadline.
    #[error("bridge request '{method}' timed out after {}ms", .after.as_millis())]
    Timeout { method: String, after: Duration },

    /// The channel or privileged APIs were missing at initialization.
    #[error("bridge unavailable: {0}")]
    Unavailable(String),

    /// The remote side answered with an error string.
    #[error("{0}")]
    Remote(String),

    #[error("bridge protocol error: {0}")]
    Protocol(String),
}

/// A host action service operation was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("action execution error: {0}")]
    Execution(String),

    #[error("no such tab: {0}")]
    TabNotFound(u32),

    #[error("no such window: {0}")]
    WindowNotFound(u32),
}

#[derive(Debug, thiserror::Error)]
pub enum ArcError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error(transparent)]
    Action(#[from] ActionError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}
