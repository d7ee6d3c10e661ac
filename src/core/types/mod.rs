//! Core data types for Campus Compass
//!
//! This module defines the catalog and resolution structures shared by every
//! stage of the engine.

pub mod resource;
pub mod resolution;

// Re-export commonly used types
pub use resource::{Catalog, CatalogCategory, Resource, ResourceId, ResourceLink};
pub use resolution::{CandidateMatch, MatchType, ResolutionOutcome, ResolutionState};
