//! Error types for the folio CLI
//!
//! Library errors arrive as `folio_core::Error`; this module sorts them into
//! the few categories the CLI reports differently.

use thiserror::Error;

/// Errors that can occur while running the CLI
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum CommandError {
    /// Configuration could not be loaded or resolved
    #[error("Configuration error: {0}")]
    ConfigError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Logging could not be initialized
    #[error("Logging error: {0}")]
    LoggingError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The sync pass stopped before completing
    #[error("Sync aborted: {0}")]
    SyncAborted(#[source] folio_core::Error),
}

/// Result type alias for command operations
pub type Result<T> = std::result::Result<T, CommandError>;

impl CommandError {
    /// Create a `ConfigError` from any error type
    pub fn config<E: std::error::Error + Send + Sync + 'static>(err: E) -> Self {
        Self::ConfigError(Box::new(err))
    }

    /// Create a `LoggingError` from any error type
    pub fn logging<E: std::error::Error + Send + Sync + 'static>(err: E) -> Self {
        Self::LoggingError(Box::new(err))
    }
}
