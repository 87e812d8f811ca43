//! Common error types for VoxSite

use thiserror::Error;

/// Common result type for VoxSite operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the VoxSite services
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A catalog listing source failed or returned a non-success status.
    /// The lister falls through to the next source on this error.
    #[error("Listing source '{source_name}' unavailable: {reason}")]
    SourceUnavailable { source_name: String, reason: String },

    /// Rejected file type, size, or name
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// Some rows of a multi-row persistence batch failed.
    /// Succeeded writes are left in place; callers re-fetch to resync.
    #[error("Partial batch failure: {failed} of {total} updates failed")]
    PartialBatchFailure { failed: usize, total: usize },

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}
