use core::result::Result as CoreResult;
use std::io::Error as IoError;

use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Result type for core operations.
pub type Result<T> = CoreResult<T, Error>;

/// Errors that can occur while constructing or loading a task batch.
#[derive(Debug, Error)]
pub enum Error {
    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// JSON serialization or deserialization failed.
    #[error("JSON serialization error: {0}")]
    Json(#[from] SerdeJsonError),

    /// A task was malformed at construction.
    #[error("Invalid task: {0}")]
    InvalidTask(String),

    /// A resource claim string could not be parsed.
    #[error("Invalid resource claim: {0}")]
    InvalidClaim(String),

    /// A general error not covered by other variants.
    #[error("{0}")]
    Other(String),
}
