//! Text generation seam

use async_trait::async_trait;

use super::error::GenerationError;

/// Produces reply text from a prompt
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate_content(&self, prompt: &str) -> Result<String, GenerationError>;
}
