//! Intent matching
//!
//! Resolves a query against the intent dictionary with a precision-first,
//! three-tier policy: multi-word phrases, then single tokens, then curated
//! problem phrases. A broader tier only runs when the narrower one found
//! nothing.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::curated::{ProblemEntry, PROBLEM_PATTERNS};
use super::dictionary::IntentDictionary;
use super::preprocess::preprocess;

/// Confidence assigned to each matching tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfidence {
    /// Multi-word dictionary key found in the query
    pub phrase: f32,
    /// Single query token equal to a dictionary key
    pub token: f32,
    /// Curated problem phrase found in the query
    pub problem: f32,
}

impl Default for MatchConfidence {
    fn default() -> Self {
        Self {
            phrase: 1.0,
            token: 0.8,
            problem: 0.9,
        }
    }
}

/// Which tier produced a hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchTier {
    Phrase,
    Token,
    Problem,
}

/// One recorded match before flattening to categories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentHit {
    pub category: String,
    pub confidence: f32,
    pub tier: MatchTier,
    /// Dictionary key or problem phrase that matched
    pub key: String,
}

/// Three-tier intent matcher
#[derive(Debug, Clone)]
pub struct IntentMatcher {
    confidence: MatchConfidence,
    problem_patterns: &'static [ProblemEntry],
}

impl Default for IntentMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentMatcher {
    pub fn new() -> Self {
        Self::with_confidence(MatchConfidence::default())
    }

    pub fn with_confidence(confidence: MatchConfidence) -> Self {
        Self {
            confidence,
            problem_patterns: PROBLEM_PATTERNS,
        }
    }

    /// Replace the curated problem pattern table
    pub fn with_problem_patterns(mut self, patterns: &'static [ProblemEntry]) -> Self {
        self.problem_patterns = patterns;
        self
    }

    pub fn confidence(&self) -> &MatchConfidence {
        &self.confidence
    }

    /// Matched categories, de-duplicated, most confident first
    pub fn match_query(&self, query: &str, dictionary: &IntentDictionary) -> Vec<String> {
        flatten_categories(self.match_hits(query, dictionary))
    }

    /// All recorded hits, sorted by confidence descending
    ///
    /// The sort is stable, so hits of equal confidence keep discovery order.
    pub fn match_hits(&self, query: &str, dictionary: &IntentDictionary) -> Vec<IntentHit> {
        let processed = preprocess(query);

        let mut hits = self.phrase_pass(&processed, dictionary);
        if hits.is_empty() {
            hits = self.token_pass(&processed, dictionary);
        }
        if hits.is_empty() {
            hits = self.problem_pass(&processed, &query.to_lowercase());
        }

        hits.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        debug!(
            "Intent match for {:?}: {} hit(s){}",
            processed,
            hits.len(),
            hits.first()
                .map(|h| format!(", first via {:?} key {:?}", h.tier, h.key))
                .unwrap_or_default()
        );

        hits
    }

    /// Multi-word keys contained in the processed query
    ///
    /// This is a raw substring test, so a key may also match inside a
    /// longer word.
    fn phrase_pass(&self, processed: &str, dictionary: &IntentDictionary) -> Vec<IntentHit> {
        if processed.is_empty() {
            return Vec::new();
        }
        dictionary
            .phrases()
            .filter(|(key, _)| processed.contains(key))
            .flat_map(|(key, categories)| hits_for(key, categories, self.confidence.phrase, MatchTier::Phrase))
            .collect()
    }

    /// Query tokens that are dictionary keys
    fn token_pass(&self, processed: &str, dictionary: &IntentDictionary) -> Vec<IntentHit> {
        processed
            .split_whitespace()
            .filter_map(|token| dictionary.get(token).map(|categories| (token, categories)))
            .flat_map(|(token, categories)| hits_for(token, categories, self.confidence.token, MatchTier::Token))
            .collect()
    }

    /// Curated phrases found in the processed or the raw lowercased query
    fn problem_pass(&self, processed: &str, raw_lower: &str) -> Vec<IntentHit> {
        self.problem_patterns
            .iter()
            .filter(|(phrase, _)| processed.contains(phrase) || raw_lower.contains(phrase))
            .flat_map(|(phrase, categories)| {
                categories.iter().map(move |category| IntentHit {
                    category: category.to_string(),
                    confidence: self.confidence.problem,
                    tier: MatchTier::Problem,
                    key: phrase.to_string(),
                })
            })
            .collect()
    }
}

fn hits_for(key: &str, categories: &[String], confidence: f32, tier: MatchTier) -> Vec<IntentHit> {
    categories
        .iter()
        .map(|category| IntentHit {
            category: category.clone(),
            confidence,
            tier,
            key: key.to_string(),
        })
        .collect()
}

/// Unique categories in hit order; first occurrence wins
pub fn flatten_categories(hits: Vec<IntentHit>) -> Vec<String> {
    let mut categories: Vec<String> = Vec::with_capacity(hits.len());
    for hit in hits {
        if !categories.contains(&hit.category) {
            categories.push(hit.category);
        }
    }
    categories
}
