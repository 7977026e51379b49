//! LLM Provider Layer
//!
//! A minimal completion interface over language-model backends, with a
//! Gemini implementation and a placeholder used when nothing is configured.

pub mod gemini;
mod placeholder;

pub use gemini::GeminiProvider;
pub use placeholder::PlaceholderProvider;

use async_trait::async_trait;

/// Provider errors.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("{provider} API error ({status}): {message}")]
    Api {
        provider: String,
        status: u16,
        message: String,
    },

    #[error("{provider} returned no content")]
    EmptyResponse { provider: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, ProviderError>;

/// A single-turn completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct LLMRequest {
    pub model: String,
    pub system: Option<String>,
    pub prompt: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LLMResponse {
    pub model: String,
    pub text: String,
}

#[async_trait]
pub trait Provider: Send + Sync {
    fn name(&self) -> &str;

    fn default_model(&self) -> &str;

    async fn complete(&self, request: LLMRequest) -> Result<LLMResponse>;
}
