//! Assistant service

use tracing::warn;

use super::composer::{ChatReply, ChatResponder};
use crate::catalog::CatalogSource;
use crate::core::error::Result;
use crate::core::types::{ResolutionOutcome, ResolutionState};
use crate::resolver::ResolutionOrchestrator;
use crate::vector::BuildReport;

/// Catalog source, orchestrator and responder behind one entry point
pub struct AssistantService<S: CatalogSource> {
    source: S,
    orchestrator: ResolutionOrchestrator,
    responder: ChatResponder,
}

impl<S: CatalogSource> AssistantService<S> {
    pub fn new(source: S, orchestrator: ResolutionOrchestrator, responder: ChatResponder) -> Self {
        Self {
            source,
            orchestrator,
            responder,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn orchestrator(&self) -> &ResolutionOrchestrator {
        &self.orchestrator
    }

    /// Warm the embedding index from the current catalog
    pub async fn initialize_embeddings(&self) -> Result<BuildReport> {
        let catalog = self.source.snapshot().await?;
        Ok(self.orchestrator.initialize_embeddings(&catalog).await)
    }

    /// Resolve against a fresh catalog snapshot
    pub async fn resolve(&self, query: &str) -> ResolutionOutcome {
        match self.source.snapshot().await {
            Ok(catalog) => self.orchestrator.resolve_query(query, &catalog).await,
            Err(e) => {
                warn!("Catalog unavailable: {}", e);
                ResolutionOutcome::failed(
                    e.kind(),
                    e.to_string(),
                    vec![ResolutionState::Start, ResolutionState::Done],
                )
            }
        }
    }

    /// Resolve and compose a reply
    pub async fn answer(&self, query: &str) -> ChatReply {
        let outcome = self.resolve(query).await;
        self.responder.compose(query, &outcome).await
    }
}
