//! Embedding index for Campus Compass
//!
//! In-memory, rebuilt as a whole, searched by brute-force cosine similarity.

mod config;
mod error;
mod index;

#[cfg(test)]
mod tests;

pub use config::SearchConfig;
pub use error::{IndexError, IndexResult};
pub use index::{BuildReport, EmbeddingIndex, FailedResource, IndexSnapshot, IndexedResource, SkippedResource};
