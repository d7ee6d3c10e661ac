//! Catalog access for Campus Compass
//!
//! This module provides:
//! - Resource text extraction for embeddings and keyword mining
//! - Read-only catalog sources (in-memory and JSON file)

mod text;
mod source;


pub use text::extract_resource_text;
pub use source::{load_catalog_file, parse_catalog, CatalogSource, JsonFileCatalog, StaticCatalog};
