//! Embedding index configuration

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Similarity search and build settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Minimum cosine similarity for a result to be kept
    pub similarity_threshold: f32,

    /// Maximum number of results returned by a search
    pub max_results: usize,

    /// Embedding calls in flight during a rebuild
    pub build_concurrency: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.6,
            max_results: 5,
            build_concurrency: 4,
        }
    }
}

impl SearchConfig {
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_build_concurrency(mut self, concurrency: usize) -> Self {
        self.build_concurrency = concurrency;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "similarity_threshold must be within [0, 1], got {}",
                    self.similarity_threshold
                ),
            });
        }
        if self.max_results == 0 {
            return Err(ConfigError::Invalid {
                reason: "max_results must be at least 1".to_string(),
            });
        }
        if self.build_concurrency == 0 {
            return Err(ConfigError::Invalid {
                reason: "build_concurrency must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
