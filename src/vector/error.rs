//! Embedding index error types

use thiserror::Error;

/// Result type for index operations
pub type IndexResult<T> = Result<T, IndexError>;

/// Embedding index specific errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    #[error("Embedding index is not ready; build it before searching")]
    NotReady,

    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

impl IndexError {
    /// A build may make the request succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, IndexError::NotReady)
    }
}
