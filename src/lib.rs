//! Campus Compass - intent resolution and retrieval for a campus resource portal
//!
//! This crate provides:
//! - Catalog loading and text extraction
//! - Keyword-driven intent matching over a dictionary mined from the catalog
//! - Embedding-based semantic search with an atomically swapped index
//! - The resolution pipeline that blends both, and grounded reply composition

pub mod catalog;
pub mod config;
pub mod core;
pub mod embeddings;
pub mod intent;
pub mod logging;
pub mod resolver;
pub mod responder;
pub mod vector;

// Re-export commonly used items
pub use catalog::{CatalogSource, JsonFileCatalog, StaticCatalog};
pub use config::{AppConfig, ConfigStore, ConfigStoreConfig};
pub use core::error::{AssistantError, ErrorKind, Result};
pub use core::types::{Catalog, CandidateMatch, MatchType, ResolutionOutcome, Resource};
pub use embeddings::{EmbeddingGateway, EmbeddingProvider, GeminiClient, HashingEmbeddingProvider};
pub use resolver::{ResolutionConfig, ResolutionOrchestrator};
pub use responder::{AssistantService, ChatReply, ChatResponder};
pub use vector::{EmbeddingIndex, SearchConfig};
