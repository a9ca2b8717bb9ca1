//! Common error types for Longbox

use thiserror::Error;

/// Common result type for Longbox operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across Longbox services
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (message from the storage backend)
    #[error("Database error: {0}")]
    Database(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
