//! Error types for the bot.

use crate::config::ConfigError;
use crate::platform::PlatformError;
use thiserror::Error;

/// Result type for bot operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a handler or startup.
///
/// Platform failures inside the core (link creation, notifications,
/// command replies) never reach this type; they are logged and dropped
/// where they happen.
#[derive(Debug, Error)]
pub enum Error {
    /// Ledger failure; the credit or purge did not happen
    #[error("Ledger error: {0}")]
    Ledger(#[from] reftrack_ledger::Error),

    /// Invalid or missing configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Platform failure outside the core (startup calls)
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    /// A ledger task panicked or was cancelled
    #[error("Storage task failed: {0}")]
    Blocking(#[from] tokio::task::JoinError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
