//! Reply composition
//!
//! Picks a phrasing strategy from the match type. Only intent and semantic
//! outcomes reach the generator, and then only with the matched resources.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::generator::TextGenerator;
use super::prompt::{build_prompt, templated_reply, ERROR_MESSAGE, FALLBACK_MESSAGE};
use crate::core::types::{MatchType, ResolutionOutcome, Resource};

/// Final answer handed to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub text: String,
    pub match_type: MatchType,
    /// Matched resources, in rank order
    pub resources: Vec<Resource>,
    /// Whether `text` came from the generator
    pub generated: bool,
}

/// Turns a resolution outcome into a reply
#[derive(Clone, Default)]
pub struct ChatResponder {
    generator: Option<Arc<dyn TextGenerator>>,
}

impl ChatResponder {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator: Some(generator),
        }
    }

    /// Responder that never calls a generator
    pub fn templated() -> Self {
        Self { generator: None }
    }

    pub fn has_generator(&self) -> bool {
        self.generator.is_some()
    }

    pub async fn compose(&self, query: &str, outcome: &ResolutionOutcome) -> ChatReply {
        let resources: Vec<Resource> = outcome.matches.iter().map(|m| m.resource.clone()).collect();

        let (text, generated) = match outcome.match_type {
            MatchType::Error => (ERROR_MESSAGE.to_string(), false),
            MatchType::Fallback => (FALLBACK_MESSAGE.to_string(), false),
            // A success with no matches is answered like a fallback
            _ if outcome.matches.is_empty() => (FALLBACK_MESSAGE.to_string(), false),
            match_type => match &self.generator {
                Some(generator) => {
                    let prompt = build_prompt(query, match_type, &outcome.matches);
                    match generator.generate_content(&prompt).await {
                        Ok(text) => (text.trim().to_string(), true),
                        Err(e) => {
                            warn!("Reply generation failed, using templated listing: {}", e);
                            (templated_reply(&outcome.matches), false)
                        }
                    }
                }
                None => (templated_reply(&outcome.matches), false),
            },
        };

        debug!("Composed {} reply (generated={})", outcome.match_type, generated);
        ChatReply {
            text,
            match_type: outcome.match_type,
            resources,
            generated,
        }
    }
}
