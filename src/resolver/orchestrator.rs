//! Resolution orchestrator
//!
//! Intent first, refined by embedding similarity; whole-index semantic
//! search when no intent is found; a generic fallback when nothing matches.
//! Every failure is folded into the returned [`ResolutionOutcome`].

use std::sync::Arc;

use tracing::{debug, error, info_span, warn, Instrument};
use uuid::Uuid;

use super::config::ResolutionConfig;
use crate::core::error::{AssistantError, Result};
use crate::core::types::{CandidateMatch, Catalog, MatchType, ResolutionOutcome, ResolutionState};
use crate::embeddings::cosine_similarity;
use crate::intent::{IntentDictionaryBuilder, IntentMatcher};
use crate::vector::{BuildReport, EmbeddingIndex, IndexSnapshot};

/// Ties the intent matcher and the embedding index together
pub struct ResolutionOrchestrator {
    index: Arc<EmbeddingIndex>,
    dictionary_builder: IntentDictionaryBuilder,
    matcher: IntentMatcher,
    config: ResolutionConfig,
}

impl ResolutionOrchestrator {
    pub fn new(index: Arc<EmbeddingIndex>, config: ResolutionConfig) -> Self {
        Self {
            index,
            dictionary_builder: IntentDictionaryBuilder::new(),
            matcher: IntentMatcher::with_confidence(config.match_confidence()),
            config,
        }
    }

    /// Replace the dictionary builder, e.g. to drop the legacy details adapter
    pub fn with_dictionary_builder(mut self, builder: IntentDictionaryBuilder) -> Self {
        self.dictionary_builder = builder;
        self
    }

    pub fn index(&self) -> &Arc<EmbeddingIndex> {
        &self.index
    }

    pub fn config(&self) -> &ResolutionConfig {
        &self.config
    }

    /// Build the embedding index unless it is already ready
    ///
    /// Idempotent: once ready, returns the report of the build that got it
    /// there.
    pub async fn initialize_embeddings(&self, catalog: &Catalog) -> BuildReport {
        if let Some(report) = self.index.ensure_ready(catalog).await {
            return report;
        }
        match self.index.last_report() {
            Some(report) => report,
            None => self.index.rebuild(catalog).await,
        }
    }

    /// Unconditionally rebuild the embedding index
    pub async fn rebuild_embeddings(&self, catalog: &Catalog) -> BuildReport {
        self.index.rebuild(catalog).await
    }

    /// Resolve a free-text query against `catalog`
    pub async fn resolve_query(&self, query: &str, catalog: &Catalog) -> ResolutionOutcome {
        let span = info_span!("resolve_query", request_id = %Uuid::new_v4());
        async {
            let mut path = vec![ResolutionState::Start];
            match self.run(query, catalog, &mut path).await {
                Ok((match_type, matches)) => {
                    debug!(
                        "Resolved {:?} as {} with {} match(es) via {:?}",
                        query,
                        match_type,
                        matches.len(),
                        path
                    );
                    ResolutionOutcome::matched(match_type, matches, path)
                }
                Err(e) => {
                    path.push(ResolutionState::Done);
                    error!("Failed to resolve {:?}: {}", query, e);
                    ResolutionOutcome::failed(e.kind(), e.to_string(), path)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn run(
        &self,
        query: &str,
        catalog: &Catalog,
        path: &mut Vec<ResolutionState>,
    ) -> Result<(MatchType, Vec<CandidateMatch>)> {
        if query.trim().is_empty() {
            return Err(AssistantError::InvalidInput {
                reason: "query is empty".to_string(),
            });
        }

        if let Some(report) = self.index.ensure_ready(catalog).await {
            if !report.ready {
                warn!("Embedding index could not be built; continuing with intent matching only");
            }
        }
        // One snapshot serves the whole query, even if a rebuild lands meanwhile
        let snapshot = self.index.snapshot();
        let dictionary = self.dictionary_builder.build(catalog);

        let categories = self.matcher.match_query(query, &dictionary);
        if !categories.is_empty() {
            path.push(ResolutionState::IntentMatched);
            let mut candidates: Vec<CandidateMatch> = categories
                .iter()
                .flat_map(|category| {
                    catalog.resources_in(category).iter().map(move |resource| {
                        let mut candidate =
                            CandidateMatch::from_intent(resource.clone(), self.config.intent_baseline);
                        candidate.category = category.clone();
                        candidate
                    })
                })
                .collect();

            if !candidates.is_empty() {
                self.refine(query, &snapshot, &mut candidates).await;
                path.push(ResolutionState::RefinedBySimilarity);
                path.push(ResolutionState::Done);
                return Ok((MatchType::Intent, candidates));
            }
            debug!("Matched categories {:?} hold no resources", categories);
        }

        path.push(ResolutionState::NoIntent);
        path.push(ResolutionState::SemanticSearch);
        let query_vector = self.index.gateway().embed(query).await?;
        let search = self.index.config();
        let matches = snapshot.search(&query_vector, search.similarity_threshold, search.max_results)?;
        if !matches.is_empty() {
            path.push(ResolutionState::Done);
            return Ok((MatchType::Semantic, matches));
        }

        path.push(ResolutionState::NoMatch);
        path.push(ResolutionState::Done);
        Ok((MatchType::Fallback, Vec::new()))
    }

    /// Blend similarity into intent candidates, then rank and truncate
    ///
    /// Best-effort: if the query cannot be embedded the intent ranking stands.
    async fn refine(&self, query: &str, snapshot: &IndexSnapshot, candidates: &mut Vec<CandidateMatch>) {
        if snapshot.is_ready() {
            match self.index.gateway().embed(query).await {
                Ok(query_vector) => {
                    for candidate in candidates.iter_mut() {
                        if let Some(entry) = snapshot.get(candidate.resource.id) {
                            let similarity = cosine_similarity(&query_vector, &entry.embedding);
                            let intent_score = candidate.intent_score.unwrap_or(candidate.score);
                            candidate.similarity = Some(similarity);
                            candidate.score = self.config.blend(intent_score, similarity);
                        }
                    }
                }
                Err(e) => warn!("Similarity refinement skipped, keeping intent ranking: {}", e),
            }
        } else {
            debug!("Embedding index not ready; keeping intent ranking");
        }

        candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        candidates.truncate(self.config.max_intent_results);
    }
}
