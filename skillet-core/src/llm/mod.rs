//! LLM provider abstraction.
//!
//! The grocery aggregator's escalation fallback and the conversational
//! planner both consume this trait. Implementations make the API call and
//! hand back the model's raw text; callers that need structured output spell
//! the JSON contract out in the prompt and parse the response defensively,
//! because malformed output is a normal failure mode.

mod claude;
mod fake;

pub use claude::ClaudeProvider;
pub use fake::FakeProvider;

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Error type for LLM operations.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("API returned error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Rate limited, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Provider not configured: {0}")]
    NotConfigured(String),
}

/// Trait for LLM providers.
///
/// Implementations should be stateless and thread-safe.
#[async_trait]
pub trait LlmProvider: Send + Sync + fmt::Debug {
    /// Send a prompt to the model and return its text response.
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;

    /// Provider name (e.g. "claude", "fake").
    fn provider_name(&self) -> &'static str;

    /// Model name the provider is configured with.
    fn model_name(&self) -> &str;
}

/// Select a provider from the environment.
///
/// - `SKILLET_LLM_PROVIDER`: "claude" | "fake" (default "fake")
/// - `SKILLET_LLM_MODEL`: model name for the real provider
/// - `ANTHROPIC_API_KEY`: API key for Claude
pub fn provider_from_env() -> Result<Box<dyn LlmProvider>, LlmError> {
    let provider =
        std::env::var("SKILLET_LLM_PROVIDER").unwrap_or_else(|_| "fake".to_string());

    match provider.as_str() {
        "fake" => Ok(Box::new(FakeProvider::default())),
        "claude" => {
            let api_key = std::env::var("ANTHROPIC_API_KEY")
                .map_err(|_| LlmError::NotConfigured("ANTHROPIC_API_KEY not set".to_string()))?;
            let model = std::env::var("SKILLET_LLM_MODEL")
                .unwrap_or_else(|_| "claude-3-5-sonnet-20241022".to_string());
            Ok(Box::new(ClaudeProvider::new(api_key, model)))
        }
        other => Err(LlmError::NotConfigured(format!(
            "unknown provider: {other}"
        ))),
    }
}
