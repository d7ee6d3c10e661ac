//! Error types for reply generation

use thiserror::Error;

/// Errors raised by a text generator
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Generation provider failed: {reason}")]
    ProviderFailed { reason: String },

    #[error("Malformed generation response: {reason}")]
    MalformedResponse { reason: String },

    #[error("Generation returned no text")]
    EmptyResponse,

    #[error("Network error: {reason}")]
    Network { reason: String },

    #[error("Generation timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Generation provider not configured: {reason}")]
    NotConfigured { reason: String },
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GenerationError::Timeout { timeout_ms: 0 }
        } else if err.is_connect() {
            GenerationError::Network {
                reason: format!("Connection failed: {}", err),
            }
        } else if err.is_decode() {
            GenerationError::MalformedResponse {
                reason: err.to_string(),
            }
        } else {
            GenerationError::ProviderFailed {
                reason: err.to_string(),
            }
        }
    }
}

impl GenerationError {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GenerationError::ProviderFailed { .. }
                | GenerationError::Network { .. }
                | GenerationError::Timeout { .. }
        )
    }
}
