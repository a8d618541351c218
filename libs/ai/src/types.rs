//! Chat-completion wire types

use serde::{Deserialize, Serialize};

pub const DEFAULT_ENDPOINT: &str = "https://api.mistral.ai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "pixtral-12b-2409";
pub const DEFAULT_MAX_TOKENS: u32 = 2500;

/// Configuration for [`crate::ChatCompletionClient`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatCompletionConfig {
    /// Full URL of the chat completions endpoint
    pub endpoint: String,
    /// Bearer token
    pub api_key: String,
    /// Model identifier sent with every request
    pub model: String,
    /// Upper bound on generated tokens
    pub max_tokens: u32,
}

impl ChatCompletionConfig {
    /// Create new config with API key and the default endpoint and model
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Set endpoint URL
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set max tokens
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Chat completion request body
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub max_tokens: u32,
    pub messages: Vec<ChatMessage>,
}

impl ChatCompletionRequest {
    /// Single user-turn request
    pub fn user_prompt(config: &ChatCompletionConfig, prompt: &str) -> Self {
        Self {
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}
