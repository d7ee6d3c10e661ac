//! Embedding index
//!
//! Holds one embedding per catalog resource. A rebuild embeds the whole
//! catalog into a fresh [`IndexSnapshot`] and swaps it in with a single
//! pointer write, so a reader always works against one complete snapshot.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::config::SearchConfig;
use super::error::{IndexError, IndexResult};
use crate::catalog::extract_resource_text;
use crate::core::types::{CandidateMatch, Catalog, Resource, ResourceId};
use crate::embeddings::{cosine_similarity, EmbeddingGateway, EmbeddingResult};

/// A resource together with its embedding
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedResource {
    pub resource: Resource,
    pub category: String,
    pub embedding: Vec<f32>,
    /// Exact text that produced the embedding
    pub text_representation: String,
}

/// Immutable result of one index build
#[derive(Debug, Clone, Default)]
pub struct IndexSnapshot {
    entries: Vec<IndexedResource>,
    by_id: HashMap<ResourceId, usize>,
    dimension: usize,
    ready: bool,
    built_at: Option<DateTime<Utc>>,
}

impl IndexSnapshot {
    /// The never-built snapshot
    pub fn empty() -> Self {
        Self::default()
    }

    fn from_entries(entries: Vec<IndexedResource>, dimension: usize, built_at: DateTime<Utc>) -> Self {
        let by_id = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.resource.id, i))
            .collect();
        Self {
            ready: !entries.is_empty(),
            entries,
            by_id,
            dimension,
            built_at: Some(built_at),
        }
    }

    pub fn get(&self, id: ResourceId) -> Option<&IndexedResource> {
        self.by_id.get(&id).map(|&i| &self.entries[i])
    }

    pub fn entries(&self) -> &[IndexedResource] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Vector length shared by every entry; 0 when empty
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn built_at(&self) -> Option<DateTime<Utc>> {
        self.built_at
    }

    /// Rank entries by cosine similarity to `query`
    ///
    /// Ties keep catalog order. Results below `threshold` are dropped and at
    /// most `max_results` are returned.
    pub fn search(&self, query: &[f32], threshold: f32, max_results: usize) -> IndexResult<Vec<CandidateMatch>> {
        if !self.ready {
            return Err(IndexError::NotReady);
        }
        if query.len() != self.dimension {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let mut scored: Vec<(f32, &IndexedResource)> = self
            .entries
            .iter()
            .map(|entry| (cosine_similarity(query, &entry.embedding), entry))
            .collect();

        // sort_by is stable, so equal scores stay in catalog order
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        Ok(scored
            .into_iter()
            .filter(|(score, _)| *score >= threshold)
            .take(max_results)
            .map(|(score, entry)| {
                let mut candidate = CandidateMatch::from_similarity(entry.resource.clone(), score);
                candidate.category = entry.category.clone();
                candidate
            })
            .collect())
    }
}

/// Resource left out of a build because it had no text to embed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedResource {
    pub id: ResourceId,
    pub category: String,
}

/// Resource whose embedding failed during a build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedResource {
    pub id: ResourceId,
    pub category: String,
    pub error: String,
}

/// Outcome of one index build
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildReport {
    /// Resources embedded successfully
    pub indexed: usize,
    pub skipped: Vec<SkippedResource>,
    pub failed: Vec<FailedResource>,
    /// Vector length fixed by the first successful embedding
    pub dimension: Option<usize>,
    pub ready: bool,
    pub duration_ms: u64,
    pub built_at: DateTime<Utc>,
    pub model_id: String,
}

impl BuildReport {
    /// Resources considered by the build
    pub fn total(&self) -> usize {
        self.indexed + self.skipped.len() + self.failed.len()
    }
}

/// Process-wide embedding index with atomic snapshot swap
pub struct EmbeddingIndex {
    gateway: EmbeddingGateway,
    config: SearchConfig,
    snapshot: RwLock<Arc<IndexSnapshot>>,
    /// Serializes rebuilds; readers never take it
    rebuild_lock: Mutex<()>,
    last_report: RwLock<Option<BuildReport>>,
}

impl EmbeddingIndex {
    pub fn new(gateway: EmbeddingGateway, config: SearchConfig) -> Self {
        Self {
            gateway,
            config,
            snapshot: RwLock::new(Arc::new(IndexSnapshot::empty())),
            rebuild_lock: Mutex::new(()),
            last_report: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn gateway(&self) -> &EmbeddingGateway {
        &self.gateway
    }

    /// Current snapshot; stays valid even if a rebuild swaps in a new one
    pub fn snapshot(&self) -> Arc<IndexSnapshot> {
        Arc::clone(&self.snapshot.read())
    }

    pub fn is_ready(&self) -> bool {
        self.snapshot.read().is_ready()
    }

    pub fn last_report(&self) -> Option<BuildReport> {
        self.last_report.read().clone()
    }

    /// Search the current snapshot with the configured threshold and limit
    pub fn search(&self, query: &[f32]) -> IndexResult<Vec<CandidateMatch>> {
        self.snapshot()
            .search(query, self.config.similarity_threshold, self.config.max_results)
    }

    /// Rebuild from `catalog`, waiting for any rebuild already running
    pub async fn rebuild(&self, catalog: &Catalog) -> BuildReport {
        let _guard = self.rebuild_lock.lock().await;
        self.build_locked(catalog).await
    }

    /// Build only if no ready snapshot exists yet
    ///
    /// Returns `None` when the index was already ready.
    pub async fn ensure_ready(&self, catalog: &Catalog) -> Option<BuildReport> {
        if self.is_ready() {
            return None;
        }
        let _guard = self.rebuild_lock.lock().await;
        if self.is_ready() {
            return None;
        }
        Some(self.build_locked(catalog).await)
    }

    async fn build_locked(&self, catalog: &Catalog) -> BuildReport {
        let span = info_span!("index_rebuild", build_id = %Uuid::new_v4());
        async {
            let start = Instant::now();
            let gateway = &self.gateway;
            let concurrency = self.config.build_concurrency.max(1);

            let jobs: Vec<(String, Resource, String)> = catalog
                .iter_resources()
                .map(|(category, resource)| {
                    let text = extract_resource_text(resource, category);
                    (category.to_string(), resource.clone(), text)
                })
                .collect();

            let outcomes: Vec<(String, Resource, String, Option<EmbeddingResult<Vec<f32>>>)> =
                stream::iter(jobs.into_iter().map(|(category, resource, text)| {
                    async move {
                        if text.is_empty() {
                            return (category, resource, text, None);
                        }
                        let result = gateway.embed(&text).await;
                        (category, resource, text, Some(result))
                    }
                }))
                .buffered(concurrency)
                .collect()
                .await;

            let mut entries = Vec::with_capacity(outcomes.len());
            let mut skipped = Vec::new();
            let mut failed = Vec::new();
            let mut dimension: Option<usize> = None;

            for (category, resource, text, outcome) in outcomes {
                match outcome {
                    None => {
                        debug!("Skipping resource {} with empty text", resource.id);
                        skipped.push(SkippedResource { id: resource.id, category });
                    }
                    Some(Err(e)) => {
                        warn!("Failed to embed resource {} ({}): {}", resource.id, resource.name, e);
                        failed.push(FailedResource {
                            id: resource.id,
                            category,
                            error: e.to_string(),
                        });
                    }
                    Some(Ok(embedding)) => {
                        let expected = *dimension.get_or_insert(embedding.len());
                        if embedding.len() != expected {
                            let e = IndexError::DimensionMismatch {
                                expected,
                                actual: embedding.len(),
                            };
                            warn!("Dropping resource {} ({}): {}", resource.id, resource.name, e);
                            failed.push(FailedResource {
                                id: resource.id,
                                category,
                                error: e.to_string(),
                            });
                            continue;
                        }
                        entries.push(IndexedResource {
                            resource,
                            category,
                            embedding,
                            text_representation: text,
                        });
                    }
                }
            }

            let built_at = Utc::now();
            let snapshot = IndexSnapshot::from_entries(entries, dimension.unwrap_or(0), built_at);
            let report = BuildReport {
                indexed: snapshot.len(),
                skipped,
                failed,
                dimension,
                ready: snapshot.is_ready(),
                duration_ms: start.elapsed().as_millis() as u64,
                built_at,
                model_id: self.gateway.model_id().to_string(),
            };

            *self.snapshot.write() = Arc::new(snapshot);
            *self.last_report.write() = Some(report.clone());

            info!(
                "Embedding index built: {} indexed, {} skipped, {} failed, ready={} in {}ms",
                report.indexed,
                report.skipped.len(),
                report.failed.len(),
                report.ready,
                report.duration_ms
            );
            report
        }
        .instrument(span)
        .await
    }
}
