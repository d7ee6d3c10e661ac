//! Remote provider configuration

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Primary environment variable holding the provider API key
pub const API_KEY_ENV: &str = "CAMPUS_COMPASS_API_KEY";

/// Fallback environment variable holding the provider API key
pub const FALLBACK_API_KEY_ENV: &str = "GEMINI_API_KEY";

fn empty_key() -> SecretString {
    SecretString::new(String::new())
}

/// Hosted embedding / generation provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// API base URL, without a trailing slash
    pub base_url: String,

    /// Model used for `embedContent`
    pub embedding_model: String,

    /// Model used for `generateContent`
    pub generation_model: String,

    /// API key; never written back to disk
    #[serde(skip_serializing, default = "empty_key")]
    pub api_key: SecretString,

    /// Transport timeout; `None` leaves it to the HTTP client
    pub timeout_ms: Option<u64>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            embedding_model: "text-embedding-004".to_string(),
            generation_model: "gemini-1.5-flash".to_string(),
            api_key: empty_key(),
            timeout_ms: None,
        }
    }
}

impl ProviderConfig {
    /// Set the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = SecretString::new(api_key.into());
        self
    }

    /// Set the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the transport timeout
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.expose_secret().trim().is_empty()
    }

    /// Fill the API key from the environment if one is set
    ///
    /// Returns true when a key was found.
    pub fn apply_env(&mut self) -> bool {
        let key = [API_KEY_ENV, FALLBACK_API_KEY_ENV]
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .find(|value| !value.trim().is_empty());

        match key {
            Some(key) => {
                self.api_key = SecretString::new(key);
                true
            }
            None => false,
        }
    }
}
