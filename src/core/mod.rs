//! Campus Compass Core Module
//!
//! This module contains:
//! - Error types and their caller-facing classification
//! - Catalog and resolution data types

pub mod error;
pub mod types;

// Re-export commonly used items
pub use error::{AssistantError, ErrorKind, Result};
