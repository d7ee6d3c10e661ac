//! Embedding gateway
//!
//! Wraps an [`EmbeddingProvider`] with input validation and structural
//! checks on the returned vector. No retries happen here.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::error::{EmbeddingError, EmbeddingResult};
use super::provider::EmbeddingProvider;
use super::similarity;

/// Validated access to an embedding provider
#[derive(Clone)]
pub struct EmbeddingGateway {
    provider: Arc<dyn EmbeddingProvider>,
}

impl fmt::Debug for EmbeddingGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbeddingGateway")
            .field("model_id", &self.provider.model_id())
            .finish()
    }
}

impl EmbeddingGateway {
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self { provider }
    }

    pub fn model_id(&self) -> &str {
        self.provider.model_id()
    }

    /// Embed `text`
    ///
    /// Emptiness is judged on the trimmed text, but the provider receives
    /// the text unchanged.
    pub async fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::InvalidInput {
                reason: "text to embed is empty".to_string(),
            });
        }

        let vector = self.provider.embed_content(text).await?;
        validate_vector(&vector)?;

        debug!(
            "Embedded {} chars with {} into {} dimensions",
            text.len(),
            self.provider.model_id(),
            vector.len()
        );
        Ok(vector)
    }

    /// See [`similarity::cosine_similarity`]
    pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        similarity::cosine_similarity(a, b)
    }
}

fn validate_vector(vector: &[f32]) -> EmbeddingResult<()> {
    if vector.is_empty() {
        return Err(EmbeddingError::MalformedResponse {
            reason: "provider returned an empty vector".to_string(),
        });
    }
    if let Some(pos) = vector.iter().position(|x| !x.is_finite()) {
        return Err(EmbeddingError::MalformedResponse {
            reason: format!("non-finite value at position {}", pos),
        });
    }
    Ok(())
}
