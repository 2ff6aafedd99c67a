//! Error types for showroom.

use thiserror::Error;

/// Result type alias using showroom's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for showroom operations.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP/network-level fault before any statement result arrived
    #[error("Transport error: {0}")]
    Transport(String),

    /// The warehouse accepted the request but rejected the statement
    #[error("Backend error: {0}")]
    Backend(String),

    /// Input rejected at the boundary, no backend call attempted
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Catalog record not found by identifier
    #[error("Record not found: {0}")]
    RecordNotFound(i64),

    /// No usable credential could be resolved for the request
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Transport(e.to_string())
    }
}
