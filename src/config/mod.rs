//! Configuration Management Module for Campus Compass
//!
//! Provides persistent configuration storage with:
//! - JSON file-based storage with a default file on first run
//! - Validation of every section on load
//! - Environment overrides for secrets and the catalog location

mod storage;

pub use storage::{
    AppConfig, ConfigError, ConfigResult, ConfigStore, ConfigStoreConfig, CATALOG_PATH_ENV,
};
