//! Catalog sources
//!
//! The catalog store itself lives outside the engine; these types are the
//! read-only seam through which snapshots reach it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::core::error::{AssistantError, Result};
use crate::core::types::Catalog;

/// Provides catalog snapshots to the engine
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Read the current catalog snapshot
    async fn snapshot(&self) -> Result<Arc<Catalog>>;
}

/// In-memory catalog, replaceable as a whole
#[derive(Debug, Default)]
pub struct StaticCatalog {
    catalog: RwLock<Arc<Catalog>>,
}

impl StaticCatalog {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: RwLock::new(Arc::new(catalog)),
        }
    }

    /// Swap in a new snapshot; readers holding the old one keep it
    pub fn replace(&self, catalog: Catalog) {
        *self.catalog.write() = Arc::new(catalog);
    }

    pub fn current(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog.read())
    }
}

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn snapshot(&self) -> Result<Arc<Catalog>> {
        Ok(self.current())
    }
}

/// Catalog read from a JSON document on every snapshot
///
/// The document is a map from category name to a list of resources.
#[derive(Debug, Clone)]
pub struct JsonFileCatalog {
    path: PathBuf,
}

impl JsonFileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CatalogSource for JsonFileCatalog {
    async fn snapshot(&self) -> Result<Arc<Catalog>> {
        let catalog = load_catalog_file(&self.path).await?;
        debug!(
            "Read catalog snapshot from {:?}: {} categories, {} resources",
            self.path,
            catalog.categories().len(),
            catalog.resource_count()
        );
        Ok(Arc::new(catalog))
    }
}

/// Parse a catalog JSON document
pub fn parse_catalog(json: &str) -> Result<Catalog> {
    serde_json::from_str(json).map_err(|e| AssistantError::Catalog {
        reason: format!("Invalid catalog document: {}", e),
    })
}

/// Load and parse a catalog JSON file
pub async fn load_catalog_file(path: &Path) -> Result<Catalog> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| AssistantError::Catalog {
        reason: format!("Failed to read catalog {:?}: {}", path, e),
    })?;
    let catalog = parse_catalog(&content)?;
    info!(
        "Loaded catalog {:?} with {} resources",
        path,
        catalog.resource_count()
    );
    Ok(catalog)
}
