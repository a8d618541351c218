//! Chat completion client for OpenAI-compatible endpoints

use crate::error::{ChatResult, CompletionError};
use crate::fence::strip_html_fence;
use crate::provider::CompletionProvider;
use crate::tls::create_platform_tls_client;
use crate::types::{ChatCompletionConfig, ChatCompletionRequest};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

pub struct ChatCompletionClient {
    config: ChatCompletionConfig,
    client: Client,
}

impl ChatCompletionClient {
    pub fn new(config: ChatCompletionConfig) -> Result<Self, CompletionError> {
        let client = create_platform_tls_client()?;
        Ok(Self::with_http_client(config, client))
    }

    pub fn with_http_client(config: ChatCompletionConfig, client: Client) -> Self {
        Self { config, client }
    }

    async fn post_prompt(&self, prompt: &str) -> Result<String, CompletionError> {
        let body = ChatCompletionRequest::user_prompt(&self.config, prompt);

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                endpoint = %self.config.endpoint,
                status = status.as_u16(),
                "chat completion API returned a non-success status"
            );
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl CompletionProvider for ChatCompletionClient {
    fn provider_id(&self) -> &str {
        "chat-completions"
    }

    async fn complete(&self, prompt: &str) -> ChatResult {
        debug!(
            provider = self.provider_id(),
            model = %self.config.model,
            prompt_chars = prompt.chars().count(),
            "sending completion request"
        );

        let body = match self.post_prompt(prompt).await {
            Ok(body) => body,
            Err(error) => {
                warn!(provider = self.provider_id(), %error, "completion request failed");
                return Err(error);
            }
        };

        let result = extract_content(&body);
        if let Err(error) = &result {
            warn!(
                provider = self.provider_id(),
                kind = error.kind(),
                "completion response rejected"
            );
        }
        result
    }
}

/// Pull `choices[0].message.content` out of a raw response body and strip
/// any surrounding html fence.
pub fn extract_content(body: &str) -> ChatResult {
    let value: Value = serde_json::from_str(body).map_err(|_| CompletionError::Decode)?;

    let content = value
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .ok_or(CompletionError::Format)?;

    Ok(strip_html_fence(content))
}
