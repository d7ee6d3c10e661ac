//! Query resolution for Campus Compass
//!
//! The state machine that turns a free-text query into a ranked resource
//! list with a match type.

mod config;
mod orchestrator;

#[cfg(test)]
mod tests;

pub use config::ResolutionConfig;
pub use orchestrator::ResolutionOrchestrator;
