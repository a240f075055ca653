//! Hosted language model access.

pub mod anthropic;

use async_trait::async_trait;
use regdoc_core::LlmConfig;
use std::sync::Arc;
use thiserror::Error;

pub use anthropic::AnthropicClient;

/// Why a model call produced no answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("Language model is not configured: {0}")]
    Configuration(String),

    #[error("Failed to reach language model: {0}")]
    Transport(String),

    #[error("Language model API returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Language model returned an empty response")]
    EmptyResponse,

    #[error("Failed to parse language model response: {0}")]
    InvalidResponse(String),
}

impl QueryError {
    /// Short machine-readable kind, used in logs and API error details.
    pub fn kind(&self) -> &'static str {
        match self {
            QueryError::Configuration(_) => "configuration",
            QueryError::Transport(_) => "transport",
            QueryError::Api { .. } => "api",
            QueryError::EmptyResponse => "empty_response",
            QueryError::InvalidResponse(_) => "invalid_response",
        }
    }

    /// Apology text shown in place of an answer.
    pub fn fallback_text(&self) -> String {
        format!(
            "I apologize, but I'm currently unable to process your request. Please try again later or contact your system administrator. Error: {}",
            self
        )
    }
}

/// A stateless text-generation backend. Every call carries its full context.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(
        &self,
        system: &str,
        user: &str,
        max_tokens: u32,
    ) -> Result<String, QueryError>;

    /// Model identifier sent with each request
    fn model_id(&self) -> &str;

    /// Whether the backend has the credentials it needs to be called at all
    fn is_configured(&self) -> bool {
        true
    }
}

/// Build the configured language model client.
pub fn create_language_model(config: &LlmConfig) -> Result<Arc<dyn LanguageModel>, QueryError> {
    let client = AnthropicClient::new(config)?;
    if !client.is_configured() {
        tracing::warn!("ANTHROPIC_API_KEY not set; chat answers will report a configuration error");
    }
    Ok(Arc::new(client))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_text_embeds_error_message() {
        let err = QueryError::Transport("connection reset by peer".to_string());
        let text = err.fallback_text();
        assert!(text.starts_with("I apologize, but I'm currently unable to process your request."));
        assert!(text.ends_with("Error: Failed to reach language model: connection reset by peer"));
    }

    #[test]
    fn api_error_carries_status() {
        let err = QueryError::Api {
            status: 429,
            body: "rate limited".to_string(),
        };
        assert_eq!(err.kind(), "api");
        assert!(err.to_string().contains("429"));
        assert!(err.fallback_text().contains("rate limited"));
    }
}
