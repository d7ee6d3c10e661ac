//! Error types for Campus Compass
//!
//! Every module keeps its own error enum; `AssistantError` aggregates them
//! and classifies each into one of the four kinds reported to callers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ConfigError;
use crate::embeddings::EmbeddingError;
use crate::logging::LoggingError;
use crate::responder::GenerationError;
use crate::vector::IndexError;

/// Result type alias for Campus Compass operations
pub type Result<T> = std::result::Result<T, AssistantError>;

/// Caller-facing error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Empty or malformed query/text; never retried
    InvalidInput,
    /// Remote embedding call failed or returned malformed data
    EmbeddingProvider,
    /// Search attempted before any successful index build
    NotReady,
    /// Anything unanticipated
    Internal,
}

/// Main error type for Campus Compass
#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("Catalog error: {reason}")]
    Catalog { reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AssistantError {
    /// Classify the error for the caller
    pub fn kind(&self) -> ErrorKind {
        match self {
            AssistantError::Embedding(EmbeddingError::InvalidInput { .. }) => ErrorKind::InvalidInput,
            AssistantError::Embedding(_) => ErrorKind::EmbeddingProvider,
            AssistantError::Index(IndexError::NotReady) => ErrorKind::NotReady,
            AssistantError::InvalidInput { .. } => ErrorKind::InvalidInput,
            _ => ErrorKind::Internal,
        }
    }

    /// Check if retrying the same call may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            AssistantError::Embedding(e) => e.is_retryable(),
            AssistantError::Index(IndexError::NotReady) => true,
            _ => false,
        }
    }
}
