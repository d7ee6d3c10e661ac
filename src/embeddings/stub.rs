//! Static embedding provider
//!
//! Returns caller-specified vectors. Used to pin scores in tests and demos
//! without depending on a real model's output distribution.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use super::error::{EmbeddingError, EmbeddingResult};
use super::provider::EmbeddingProvider;

/// Text → vector table with injectable failures
///
/// Lookup order: exact text, injected failures, then the first registered
/// fragment contained in the lowercased text, then the default vector.
#[derive(Debug, Default)]
pub struct StaticEmbeddingProvider {
    exact: HashMap<String, Vec<f32>>,
    fragments: Vec<(String, Vec<f32>)>,
    default: Option<Vec<f32>>,
    failing: HashSet<String>,
    unavailable: AtomicBool,
    calls: AtomicUsize,
}

impl StaticEmbeddingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Vector for an exact text
    pub fn with_vector(mut self, text: impl Into<String>, vector: Vec<f32>) -> Self {
        self.exact.insert(text.into(), vector);
        self
    }

    /// Vector for any text containing `fragment` (case-insensitive)
    pub fn with_fragment(mut self, fragment: &str, vector: Vec<f32>) -> Self {
        self.fragments.push((fragment.to_lowercase(), vector));
        self
    }

    /// Vector for texts nothing else matched
    pub fn with_default(mut self, vector: Vec<f32>) -> Self {
        self.default = Some(vector);
        self
    }

    /// Fail whenever the text contains `fragment` (case-insensitive)
    pub fn failing_on(mut self, fragment: &str) -> Self {
        self.failing.insert(fragment.to_lowercase());
        self
    }

    /// Simulate a provider that cannot be reached at all
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of embed calls received so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn lookup(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        if let Some(vector) = self.exact.get(text) {
            return Ok(vector.clone());
        }

        let lowered = text.to_lowercase();
        if self.failing.iter().any(|f| lowered.contains(f.as_str())) {
            return Err(EmbeddingError::ProviderFailed {
                reason: format!("injected failure for {:?}", text),
            });
        }

        self.fragments
            .iter()
            .find(|(fragment, _)| lowered.contains(fragment.as_str()))
            .map(|(_, vector)| vector.clone())
            .or_else(|| self.default.clone())
            .ok_or_else(|| EmbeddingError::ProviderFailed {
                reason: format!("no vector registered for {:?}", text),
            })
    }
}

#[async_trait]
impl EmbeddingProvider for StaticEmbeddingProvider {
    async fn embed_content(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(EmbeddingError::Network {
                reason: "provider unreachable".to_string(),
            });
        }
        self.lookup(text)
    }

    fn model_id(&self) -> &str {
        "static"
    }
}
