//! Error types for secret generation.

use secretagent_core::ValidationErrors;
use secretagent_providers::ProviderError;
use secretagent_storage::StorageError;
use thiserror::Error;

/// Result type for generation operations.
pub type Result<T> = std::result::Result<T, GenerationError>;

/// Generation error types.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The form failed validation; nothing was sent to the generator.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// Another generation request for the same draft is still running.
    #[error("A generation request is already in progress")]
    Busy,

    /// Save was requested before anything was generated.
    #[error("Nothing has been generated yet")]
    NothingGenerated,

    /// The model provider failed.
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The generator answered, but not in the expected shape.
    #[error("Malformed generator output: {0}")]
    MalformedOutput(String),

    /// The generated secret could not be stored.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The generator could not be built from configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl GenerationError {
    /// Create a malformed output error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedOutput(message.into())
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether re-submitting the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Busy | Self::MalformedOutput(_) => true,
            Self::Provider(e) => e.is_retryable(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable() {
        assert!(GenerationError::Busy.is_retryable());
        assert!(GenerationError::malformed("not json").is_retryable());
        assert!(GenerationError::Provider(ProviderError::Timeout(60)).is_retryable());

        assert!(!GenerationError::Provider(ProviderError::auth("bad key")).is_retryable());
        assert!(!GenerationError::NothingGenerated.is_retryable());
        assert!(!GenerationError::Validation(ValidationErrors::new()).is_retryable());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            GenerationError::NothingGenerated.to_string(),
            "Nothing has been generated yet"
        );
        assert_eq!(
            GenerationError::config("OPENAI_API_KEY environment variable not set").to_string(),
            "Configuration error: OPENAI_API_KEY environment variable not set"
        );
    }
}
