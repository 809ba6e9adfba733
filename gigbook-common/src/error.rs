//! Common error types for gigbook

use thiserror::Error;

/// Common result type for gigbook operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across gigbook crates
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

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or malformed stored value
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A row references a venue or artist that does not exist
    #[error("Data integrity error: {0}")]
    DataIntegrity(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}
