//! Deterministic offline embeddings
//!
//! Feature hashing over lowercase word tokens. Good enough to exercise the
//! semantic path without network access; not a substitute for a real model.

use async_trait::async_trait;

use super::error::EmbeddingResult;
use super::provider::EmbeddingProvider;
use super::similarity::l2_normalize;

/// Default vector length
pub const DEFAULT_DIMENSION: usize = 256;

/// Words at least this long also contribute their prefix as a feature
const STEM_CHARS: usize = 5;

/// Hashes tokens into a fixed-size, L2-normalized vector
#[derive(Debug, Clone)]
pub struct HashingEmbeddingProvider {
    dimension: usize,
    model_id: String,
}

impl Default for HashingEmbeddingProvider {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

impl HashingEmbeddingProvider {
    pub fn new(dimension: usize) -> Self {
        let dimension = dimension.max(1);
        Self {
            dimension,
            model_id: format!("blake3-hashing-{}", dimension),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Embed synchronously; identical text always yields the identical vector
    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        let lowered = text.to_lowercase();

        for token in lowered.split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty()) {
            self.add_feature(&mut vector, token, 1.0);
            if token.chars().count() > STEM_CHARS {
                let stem: String = token.chars().take(STEM_CHARS).collect();
                self.add_feature(&mut vector, &stem, 0.5);
            }
        }

        l2_normalize(&mut vector);
        vector
    }

    fn add_feature(&self, vector: &mut [f32], feature: &str, weight: f32) {
        let hash = blake3::hash(feature.as_bytes());
        let bytes = hash.as_bytes();
        let mut index_bytes = [0u8; 8];
        index_bytes.copy_from_slice(&bytes[..8]);
        let index = (u64::from_le_bytes(index_bytes) % self.dimension as u64) as usize;
        let sign = if bytes[8] & 1 == 0 { 1.0 } else { -1.0 };
        vector[index] += sign * weight;
    }
}

#[async_trait]
impl EmbeddingProvider for HashingEmbeddingProvider {
    async fn embed_content(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        Ok(self.embed_text(text))
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
