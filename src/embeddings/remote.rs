//! Hosted provider client
//!
//! Speaks the Gemini REST API: `embedContent` for vectors and
//! `generateContent` for reply text. Single attempt per call; retries are
//! the caller's decision.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::config::ProviderConfig;
use super::error::{EmbeddingError, EmbeddingResult};
use super::provider::EmbeddingProvider;
use crate::responder::{GenerationError, TextGenerator};

/// Longest slice of an error body kept in messages
const BODY_EXCERPT_CHARS: usize = 200;

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct EmbedContentRequest<'a> {
    model: String,
    content: Content<'a>,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

/// Error raised below the embedding/generation split
enum CallError {
    Status { status: StatusCode, body: String },
    Transport(reqwest::Error),
}

/// Client for the hosted embedding and generation API
pub struct GeminiClient {
    client: Client,
    config: ProviderConfig,
}

impl GeminiClient {
    /// Create a client; fails only if the HTTP client cannot be built
    pub fn new(config: ProviderConfig) -> EmbeddingResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout_ms) = config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }
        let client = builder.build().map_err(|e| EmbeddingError::NotConfigured {
            reason: format!("Failed to create HTTP client: {}", e),
        })?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// `{base}/models/{model}:{method}`
    pub fn endpoint(&self, model: &str, method: &str) -> String {
        format!(
            "{}/models/{}:{}",
            self.config.base_url.trim_end_matches('/'),
            model,
            method
        )
    }

    fn require_key(&self) -> Option<&str> {
        let key = self.config.api_key.expose_secret();
        (!key.trim().is_empty()).then_some(key.as_str())
    }

    async fn post<B: Serialize + ?Sized>(&self, url: &str, key: &str, body: &B) -> Result<Value, CallError> {
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", key)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(CallError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CallError::Status { status, body });
        }

        response.json::<Value>().await.map_err(CallError::Transport)
    }

    fn timeout_ms(&self) -> u64 {
        self.config.timeout_ms.unwrap_or(0)
    }
}

fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= BODY_EXCERPT_CHARS {
        trimmed.to_string()
    } else {
        let cut: String = trimmed.chars().take(BODY_EXCERPT_CHARS).collect();
        format!("{}...", cut)
    }
}

/// Read `embedding.values` from an `embedContent` response
pub fn parse_embedding_values(body: &Value) -> EmbeddingResult<Vec<f32>> {
    let values = body
        .get("embedding")
        .and_then(|e| e.get("values"))
        .and_then(Value::as_array)
        .ok_or_else(|| EmbeddingError::MalformedResponse {
            reason: "missing embedding.values".to_string(),
        })?;

    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            v.as_f64().map(|x| x as f32).ok_or_else(|| EmbeddingError::MalformedResponse {
                reason: format!("non-numeric value at position {}", i),
            })
        })
        .collect()
}

/// Concatenate `candidates[0].content.parts[*].text`
pub fn parse_generated_text(body: &Value) -> Result<String, GenerationError> {
    let parts = body
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(Value::as_array)
        .ok_or_else(|| GenerationError::MalformedResponse {
            reason: "missing candidates[0].content.parts".to_string(),
        })?;

    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(Value::as_str))
        .collect();

    if text.trim().is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    Ok(text)
}

#[async_trait]
impl EmbeddingProvider for GeminiClient {
    async fn embed_content(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        let key = self.require_key().ok_or_else(|| EmbeddingError::NotConfigured {
            reason: "no API key set".to_string(),
        })?;

        let model = &self.config.embedding_model;
        let request = EmbedContentRequest {
            model: format!("models/{}", model),
            content: Content {
                parts: vec![Part { text }],
            },
        };

        let start = Instant::now();
        let body = self
            .post(&self.endpoint(model, "embedContent"), key, &request)
            .await
            .map_err(|e| match e {
                CallError::Status { status, body } => {
                    warn!("embedContent returned HTTP {}", status);
                    EmbeddingError::ProviderFailed {
                        reason: format!("HTTP {}: {}", status, excerpt(&body)),
                    }
                }
                CallError::Transport(err) if err.is_timeout() => EmbeddingError::Timeout {
                    timeout_ms: self.timeout_ms(),
                },
                CallError::Transport(err) => EmbeddingError::from(err),
            })?;

        let values = parse_embedding_values(&body)?;
        debug!(
            "embedContent via {} took {}ms",
            model,
            start.elapsed().as_millis()
        );
        Ok(values)
    }

    fn model_id(&self) -> &str {
        &self.config.embedding_model
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate_content(&self, prompt: &str) -> Result<String, GenerationError> {
        let key = self.require_key().ok_or_else(|| GenerationError::NotConfigured {
            reason: "no API key set".to_string(),
        })?;

        let model = &self.config.generation_model;
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let body = self
            .post(&self.endpoint(model, "generateContent"), key, &request)
            .await
            .map_err(|e| match e {
                CallError::Status { status, body } => GenerationError::ProviderFailed {
                    reason: format!("HTTP {}: {}", status, excerpt(&body)),
                },
                CallError::Transport(err) => GenerationError::from(err),
            })?;

        parse_generated_text(&body)
    }
}
