//! Error types for the embedding gateway

use thiserror::Error;

/// Result type for embedding operations
pub type EmbeddingResult<T> = Result<T, EmbeddingError>;

/// Errors that can occur while producing an embedding
#[derive(Error, Debug)]
pub enum EmbeddingError {
    /// Empty text or otherwise unusable input
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// The provider answered with an error status
    #[error("Embedding provider failed: {reason}")]
    ProviderFailed { reason: String },

    /// The provider answered, but not with a usable vector
    #[error("Malformed provider response: {reason}")]
    MalformedResponse { reason: String },

    /// Connection-level failure
    #[error("Network error: {reason}")]
    Network { reason: String },

    /// Request timed out
    #[error("Embedding request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Provider cannot be used with the current configuration
    #[error("Embedding provider not configured: {reason}")]
    NotConfigured { reason: String },
}

impl From<reqwest::Error> for EmbeddingError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            EmbeddingError::Timeout { timeout_ms: 0 }
        } else if err.is_connect() {
            EmbeddingError::Network {
                reason: format!("Connection failed: {}", err),
            }
        } else if err.is_decode() {
            EmbeddingError::MalformedResponse {
                reason: err.to_string(),
            }
        } else {
            EmbeddingError::ProviderFailed {
                reason: err.to_string(),
            }
        }
    }
}

impl From<serde_json::Error> for EmbeddingError {
    fn from(err: serde_json::Error) -> Self {
        EmbeddingError::MalformedResponse {
            reason: err.to_string(),
        }
    }
}

impl EmbeddingError {
    /// Check if a caller may reasonably retry the request
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            EmbeddingError::ProviderFailed { .. }
                | EmbeddingError::Network { .. }
                | EmbeddingError::Timeout { .. }
        )
    }

    /// Get suggested retry delay in milliseconds
    pub fn retry_delay_ms(&self) -> Option<u64> {
        match self {
            EmbeddingError::ProviderFailed { .. } => Some(500),
            EmbeddingError::Network { .. } => Some(1000),
            EmbeddingError::Timeout { .. } => Some(2000),
            _ => None,
        }
    }
}
