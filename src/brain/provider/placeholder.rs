//! Placeholder Provider
//!
//! A stub provider used when no API key is configured.
//! Allows the gateway to start and answer with a diagnosable error.

use async_trait::async_trait;

use crate::brain::provider::{LLMRequest, LLMResponse, Provider, ProviderError, Result};

/// A placeholder provider that returns an error when used.
pub struct PlaceholderProvider;

#[async_trait]
impl Provider for PlaceholderProvider {
    fn name(&self) -> &str {
        "none"
    }

    fn default_model(&self) -> &str {
        "none"
    }

    async fn complete(&self, _request: LLMRequest) -> Result<LLMResponse> {
        Err(ProviderError::Internal(
            "No provider configured. Set provider.api_key or GEMINI_API_KEY.".to_string(),
        ))
    }
}
