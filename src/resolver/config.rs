//! Scoring policy for query resolution

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::intent::MatchConfidence;

/// Confidences and blend weights used by the orchestrator
///
/// All of these are policy. Tests pin them to get deterministic rankings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionConfig {
    /// Confidence of a multi-word dictionary match
    pub phrase_confidence: f32,
    /// Confidence of a single-token dictionary match
    pub token_confidence: f32,
    /// Confidence of a curated problem-phrase match
    pub problem_confidence: f32,
    /// Score given to every resource of a matched category
    pub intent_baseline: f32,
    /// Weight of the intent score in the blend
    pub intent_weight: f32,
    /// Weight of cosine similarity in the blend
    pub similarity_weight: f32,
    /// Resources kept after intent refinement
    pub max_intent_results: usize,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            phrase_confidence: 1.0,
            token_confidence: 0.8,
            problem_confidence: 0.9,
            intent_baseline: 0.9,
            intent_weight: 0.7,
            similarity_weight: 0.3,
            max_intent_results: 5,
        }
    }
}

impl ResolutionConfig {
    /// Create config with custom blend weights (normalized to sum to 1.0)
    pub fn with_weights(intent_weight: f32, similarity_weight: f32) -> Self {
        let sum = intent_weight + similarity_weight;
        if sum <= 0.0 {
            return Self::default();
        }
        Self {
            intent_weight: intent_weight / sum,
            similarity_weight: similarity_weight / sum,
            ..Default::default()
        }
    }

    pub fn with_max_intent_results(mut self, max: usize) -> Self {
        self.max_intent_results = max;
        self
    }

    /// Tier confidences for the intent matcher
    pub fn match_confidence(&self) -> MatchConfidence {
        MatchConfidence {
            phrase: self.phrase_confidence,
            token: self.token_confidence,
            problem: self.problem_confidence,
        }
    }

    /// Blend an intent score with a similarity, clamped to [0, 1]
    pub fn blend(&self, intent_score: f32, similarity: f32) -> f32 {
        (self.intent_weight * intent_score + self.similarity_weight * similarity).clamp(0.0, 1.0)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.intent_weight < 0.0 || self.similarity_weight < 0.0 {
            return Err(ConfigError::Invalid {
                reason: "Blend weights must not be negative".to_string(),
            });
        }
        let weight_sum = self.intent_weight + self.similarity_weight;
        if (weight_sum - 1.0).abs() > 0.001 {
            return Err(ConfigError::Invalid {
                reason: format!("Weights must sum to 1.0, got {}", weight_sum),
            });
        }
        for (name, value) in [
            ("phrase_confidence", self.phrase_confidence),
            ("token_confidence", self.token_confidence),
            ("problem_confidence", self.problem_confidence),
            ("intent_baseline", self.intent_baseline),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid {
                    reason: format!("{} must be within [0, 1], got {}", name, value),
                });
            }
        }
        if self.max_intent_results == 0 {
            return Err(ConfigError::Invalid {
                reason: "max_intent_results must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
