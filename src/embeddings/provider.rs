//! Embedding provider seam

use async_trait::async_trait;

use super::error::EmbeddingResult;

/// Turns text into a vector
///
/// Implementations are the hosted API client, the offline hashing provider
/// and the static table used in tests.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed one piece of text
    async fn embed_content(&self, text: &str) -> EmbeddingResult<Vec<f32>>;

    /// Identifier of the model producing the vectors
    fn model_id(&self) -> &str;
}
