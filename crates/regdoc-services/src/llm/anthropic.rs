//! Anthropic Messages API client.

use async_trait::async_trait;
use regdoc_core::LlmConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{LanguageModel, QueryError};

const API_VERSION: &str = "2023-06-01";

#[derive(Clone)]
pub struct AnthropicClient {
    api_key: Option<String>,
    api_base: String,
    model: String,
    client: reqwest::Client,
}

// Messages API request/response
#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<MessageParam<'a>>,
}

#[derive(Debug, Serialize)]
struct MessageParam<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlockResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlockResponse {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

impl AnthropicClient {
    pub fn new(config: &LlmConfig) -> Result<Self, QueryError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                QueryError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            api_key: config.anthropic_api_key.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            client,
        })
    }

    fn messages_url(&self) -> String {
        format!("{}/messages", self.api_base)
    }

    fn first_text(parsed: MessagesResponse) -> Result<String, QueryError> {
        let text = parsed
            .content
            .into_iter()
            .find_map(|block| match block {
                ContentBlockResponse::Text { text } => Some(text),
                ContentBlockResponse::Other => None,
            })
            .ok_or(QueryError::EmptyResponse)?;

        if text.is_empty() {
            return Err(QueryError::EmptyResponse);
        }
        Ok(text)
    }
}

#[async_trait]
impl LanguageModel for AnthropicClient {
    async fn generate(
        &self,
        system: &str,
        user: &str,
        max_tokens: u32,
    ) -> Result<String, QueryError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| QueryError::Configuration("ANTHROPIC_API_KEY is not set".to_string()))?;

        let body = MessagesRequest {
            model: &self.model,
            max_tokens,
            system,
            messages: vec![MessageParam {
                role: "user",
                content: user,
            }],
        };

        let start = std::time::Instant::now();
        let response = self
            .client
            .post(self.messages_url())
            .header("x-api-key", api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| QueryError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response.text().await.unwrap_or_default();
            tracing::warn!(
                status,
                model = %self.model,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Anthropic Messages API request failed"
            );
            return Err(QueryError::Api {
                status,
                body: error_text,
            });
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| QueryError::InvalidResponse(e.to_string()))?;

        tracing::debug!(
            model = %self.model,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Anthropic Messages API request successful"
        );

        Self::first_text(parsed)
    }

    fn model_id(&self) -> &str {
        &self.model
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}
