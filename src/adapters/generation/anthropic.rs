//! Anthropic Messages API adapter.
//!
//! System messages from the prompt go into the top-level `system` field;
//! everything else is sent as the conversation.

use async_trait::async_trait;
use reqwest::header;
use serde::{Deserialize, Serialize};

use super::{build_client, status_error, transport_error};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{GenerationConfig, MessageRole, PromptMessage};
use crate::domain::ports::{ChatModel, GenerationParameters};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";

/// Configuration for the Anthropic adapter.
#[derive(Debug, Clone)]
pub struct AnthropicChatConfig {
    /// API key (read from `ANTHROPIC_API_KEY` if not set).
    pub api_key: Option<String>,
    pub base_url: String,
    /// Value of the `anthropic-version` header.
    pub api_version: String,
    pub timeout_secs: u64,
}

impl Default for AnthropicChatConfig {
    fn default() -> Self {
        Self::from(&GenerationConfig::default())
    }
}

impl From<&GenerationConfig> for AnthropicChatConfig {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            base_url: config
                .base_url
                .as_deref()
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            api_version: API_VERSION.to_string(),
            timeout_secs: config.timeout_secs,
        }
    }
}

impl AnthropicChatConfig {
    /// Get API key from config or environment.
    pub fn get_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok())
            .filter(|key| !key.trim().is_empty())
    }
}

/// Chat model backed by `/v1/messages`.
pub struct AnthropicChatModel {
    config: AnthropicChatConfig,
    client: reqwest::Client,
}

impl AnthropicChatModel {
    pub fn new(config: AnthropicChatConfig) -> DomainResult<Self> {
        let client = build_client(config.timeout_secs)?;
        Ok(Self { config, client })
    }

    fn build_request<'a>(
        prompt: &'a PromptMessage,
        parameters: &'a GenerationParameters,
    ) -> MessagesRequest<'a> {
        MessagesRequest {
            model: &parameters.model,
            max_tokens: parameters.max_tokens,
            system: prompt.system_text(),
            messages: prompt
                .conversation()
                .map(|m| Message {
                    role: if m.role == MessageRole::Assistant {
                        "assistant"
                    } else {
                        "user"
                    },
                    content: &m.content,
                })
                .collect(),
            temperature: parameters.temperature,
        }
    }
}

#[async_trait]
impl ChatModel for AnthropicChatModel {
    fn provider_id(&self) -> &'static str {
        "anthropic"
    }

    async fn complete(
        &self,
        prompt: &PromptMessage,
        parameters: &GenerationParameters,
    ) -> DomainResult<String> {
        let api_key = self.config.get_api_key().ok_or_else(|| {
            DomainError::GenerationService("ANTHROPIC_API_KEY not set".to_string())
        })?;

        let request = Self::build_request(prompt, parameters);
        if request.messages.is_empty() {
            return Err(DomainError::GenerationService(
                "prompt has no user message to send".to_string(),
            ));
        }

        let response = self
            .client
            .post(format!("{}/v1/messages", self.config.base_url))
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-api-key", &api_key)
            .header("anthropic-version", &self.config.api_version)
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error("anthropic", &e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(status_error("anthropic", status, &body));
        }

        let result: MessagesResponse = response.json().await.map_err(|e| {
            DomainError::GenerationService(format!("Failed to parse response: {e}"))
        })?;

        // Extract text from content blocks
        let text = result
            .content
            .iter()
            .filter(|block| block.block_type == "text")
            .filter_map(|block| block.text.as_deref())
            .collect::<Vec<_>>()
            .join("\n");

        if text.is_empty() {
            return Err(DomainError::GenerationService(
                "response contained no text blocks".to_string(),
            ));
        }
        Ok(text)
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<Message<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: Option<String>,
}
