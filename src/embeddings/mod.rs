//! Embeddings for Campus Compass
//!
//! This module provides:
//! - The `EmbeddingProvider` seam and a validating `EmbeddingGateway`
//! - Cosine similarity
//! - A hosted API client, a deterministic offline provider and a static
//!   table provider for tests

mod config;
mod error;
mod gateway;
mod offline;
mod provider;
mod remote;
mod similarity;
mod stub;


pub use config::{ProviderConfig, API_KEY_ENV, FALLBACK_API_KEY_ENV};
pub use error::{EmbeddingError, EmbeddingResult};
pub use gateway::EmbeddingGateway;
pub use offline::{HashingEmbeddingProvider, DEFAULT_DIMENSION};
pub use provider::EmbeddingProvider;
pub use remote::{parse_embedding_values, parse_generated_text, GeminiClient};
pub use similarity::{cosine_similarity, l2_normalize};
pub use stub::StaticEmbeddingProvider;
