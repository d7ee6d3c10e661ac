//! Reply composition for Campus Compass
//!
//! This module provides:
//! - The `TextGenerator` seam for hosted text generation
//! - Grounded prompt construction and canned replies
//! - `ChatResponder` and the `AssistantService` entry point

mod composer;
mod error;
mod generator;
mod prompt;
mod service;


pub use composer::{ChatReply, ChatResponder};
pub use error::GenerationError;
pub use generator::TextGenerator;
pub use prompt::{build_prompt, describe_match, templated_reply, ERROR_MESSAGE, FALLBACK_MESSAGE};
pub use service::AssistantService;
