//! Error types for local storage.

use secretagent_core::ValidationErrors;
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Secret ID prefix '{prefix}' matches {count} secrets")]
    AmbiguousId { prefix: String, count: usize },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience result alias for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
