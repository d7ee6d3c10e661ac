//! Resolution types
//!
//! Defines the structures handed back to the caller after a query has been
//! resolved against the catalog.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::resource::Resource;
use crate::core::error::ErrorKind;

/// How the final resource list was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    /// Keyword or problem-phrase match, refined by similarity
    Intent,
    /// Pure embedding search over the whole index
    Semantic,
    /// Nothing matched; generic reply expected
    Fallback,
    /// Resolution failed
    Error,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Intent => "intent",
            MatchType::Semantic => "semantic",
            MatchType::Fallback => "fallback",
            MatchType::Error => "error",
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stages of the resolution state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResolutionState {
    Start,
    IntentMatched,
    RefinedBySimilarity,
    NoIntent,
    SemanticSearch,
    NoMatch,
    Done,
}

/// A resource proposed for the answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateMatch {
    pub resource: Resource,
    pub category: String,
    /// Final score used for ranking
    pub score: f32,
    /// Confidence assigned by the intent path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent_score: Option<f32>,
    /// Cosine similarity against the query embedding
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f32>,
}

impl CandidateMatch {
    /// Candidate produced by the intent path, before refinement
    pub fn from_intent(resource: Resource, confidence: f32) -> Self {
        Self {
            category: resource.category.clone(),
            resource,
            score: confidence,
            intent_score: Some(confidence),
            similarity: None,
        }
    }

    /// Candidate produced by semantic search
    pub fn from_similarity(resource: Resource, similarity: f32) -> Self {
        Self {
            category: resource.category.clone(),
            resource,
            score: similarity,
            intent_score: None,
            similarity: Some(similarity),
        }
    }
}

/// Structured result of resolving one query
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionOutcome {
    pub success: bool,
    pub matches: Vec<CandidateMatch>,
    pub match_type: MatchType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    /// States visited, in order
    pub path: Vec<ResolutionState>,
}

impl ResolutionOutcome {
    pub fn matched(
        match_type: MatchType,
        matches: Vec<CandidateMatch>,
        path: Vec<ResolutionState>,
    ) -> Self {
        Self {
            success: true,
            matches,
            match_type,
            error: None,
            error_kind: None,
            path,
        }
    }

    /// Successful resolution with nothing to show
    pub fn fallback(path: Vec<ResolutionState>) -> Self {
        Self::matched(MatchType::Fallback, Vec::new(), path)
    }

    pub fn failed(kind: ErrorKind, message: impl Into<String>, path: Vec<ResolutionState>) -> Self {
        Self {
            success: false,
            matches: Vec::new(),
            match_type: MatchType::Error,
            error: Some(message.into()),
            error_kind: Some(kind),
            path,
        }
    }

    /// Categories of the matched resources, de-duplicated in rank order
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for m in &self.matches {
            if !seen.contains(&m.category.as_str()) {
                seen.push(m.category.as_str());
            }
        }
        seen
    }
}
