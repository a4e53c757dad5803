//! Fake LLM provider for testing.
//!
//! Returns deterministic responses by substring-matching the prompt, and
//! records every prompt it receives so tests can assert how often (and with
//! what) the fallback fired.

use super::{LlmError, LlmProvider};
use std::sync::Mutex;

/// A fake provider with canned responses.
///
/// Patterns are tried in registration order; the first one contained in the
/// prompt (case-insensitive) wins. With no match, the default response is
/// returned if configured, otherwise an error.
#[derive(Debug)]
pub struct FakeProvider {
    responses: Vec<(String, String)>,
    default_response: Option<String>,
    calls: Mutex<Vec<String>>,
}

impl Default for FakeProvider {
    fn default() -> Self {
        Self {
            responses: Vec::new(),
            default_response: Some("[]".to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl FakeProvider {
    /// A provider with no responses configured; unmatched prompts error.
    pub fn new() -> Self {
        Self {
            responses: Vec::new(),
            default_response: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_response(prompt_contains: &str, response: &str) -> Self {
        let mut provider = Self::new();
        provider.add_response(prompt_contains, response);
        provider
    }

    pub fn add_response(&mut self, prompt_contains: &str, response: &str) {
        self.responses
            .push((prompt_contains.to_string(), response.to_string()));
    }

    pub fn with_default_response(mut self, response: &str) -> Self {
        self.default_response = Some(response.to_string());
        self
    }

    /// Number of completions requested so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|calls| calls.len()).unwrap_or(0)
    }

    /// Copies of every prompt received, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl LlmProvider for FakeProvider {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(prompt.to_string());
        }

        let prompt_lower = prompt.to_lowercase();
        for (pattern, response) in &self.responses {
            if prompt_lower.contains(&pattern.to_lowercase()) {
                return Ok(response.clone());
            }
        }

        match &self.default_response {
            Some(response) => Ok(response.clone()),
            None => Err(LlmError::RequestFailed(format!(
                "FakeProvider: no response configured for prompt (first 100 chars): {}",
                prompt.chars().take(100).collect::<String>()
            ))),
        }
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }

    fn model_name(&self) -> &str {
        "fake-model"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_matching_is_case_insensitive() {
        let provider = FakeProvider::with_response("HELLO", "world");
        assert_eq!(provider.complete("say hello").await.unwrap(), "world");
    }

    #[tokio::test]
    async fn test_registration_order_wins() {
        let mut provider = FakeProvider::new();
        provider.add_response("grocery", "first");
        provider.add_response("grocery list", "second");
        assert_eq!(
            provider.complete("make a grocery list").await.unwrap(),
            "first"
        );
    }

    #[tokio::test]
    async fn test_no_match_without_default_errors() {
        let provider = FakeProvider::new();
        assert!(provider.complete("anything").await.is_err());
    }

    #[tokio::test]
    async fn test_no_match_error_truncates_on_char_boundaries() {
        // A long Chinese prompt must not panic while being truncated for the
        // error message; char 100 is nowhere near a byte boundary here.
        let provider = FakeProvider::new();
        let prompt = "请为烹饪以下菜品生成一份购物清单: ".repeat(20);
        let result = provider.complete(&prompt).await;
        assert!(matches!(result, Err(LlmError::RequestFailed(_))));
    }

    #[tokio::test]
    async fn test_call_log() {
        let provider = FakeProvider::new().with_default_response("ok");
        provider.complete("one").await.unwrap();
        provider.complete("two").await.unwrap();
        assert_eq!(provider.call_count(), 2);
        assert_eq!(provider.prompts(), vec!["one".to_string(), "two".to_string()]);
    }
}
