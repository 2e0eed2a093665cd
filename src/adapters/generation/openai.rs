//! OpenAI chat completions adapter.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{build_client, status_error, transport_error};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{GenerationConfig, PromptMessage};
use crate::domain::ports::{ChatModel, GenerationParameters};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Configuration for the OpenAI chat adapter.
#[derive(Debug, Clone)]
pub struct OpenAiChatConfig {
    /// API key. Falls back to `OPENAI_API_KEY`.
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for OpenAiChatConfig {
    fn default() -> Self {
        Self::from(&GenerationConfig::default())
    }
}

impl From<&GenerationConfig> for OpenAiChatConfig {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            base_url: config
                .base_url
                .as_deref()
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            timeout_secs: config.timeout_secs,
        }
    }
}

impl OpenAiChatConfig {
    fn get_api_key(&self) -> DomainResult<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                DomainError::GenerationService(
                    "OpenAI API key not set. Set OPENAI_API_KEY env var or configure generation.api_key."
                        .to_string(),
                )
            })
    }
}

/// Chat model backed by `/chat/completions`.
pub struct OpenAiChatModel {
    config: OpenAiChatConfig,
    client: reqwest::Client,
}

impl OpenAiChatModel {
    pub fn new(config: OpenAiChatConfig) -> DomainResult<Self> {
        let client = build_client(config.timeout_secs)?;
        Ok(Self { config, client })
    }

    fn build_request<'a>(
        prompt: &'a PromptMessage,
        parameters: &'a GenerationParameters,
    ) -> ChatRequest<'a> {
        ChatRequest {
            model: &parameters.model,
            messages: prompt
                .messages
                .iter()
                .map(|m| ChatRequestMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            temperature: parameters.temperature,
            max_tokens: parameters.max_tokens,
        }
    }
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    fn provider_id(&self) -> &'static str {
        "openai"
    }

    async fn complete(
        &self,
        prompt: &PromptMessage,
        parameters: &GenerationParameters,
    ) -> DomainResult<String> {
        let api_key = self.config.get_api_key()?;
        let request = Self::build_request(prompt, parameters);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error("openai", &e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(status_error("openai", status, &body));
        }

        let result: ChatResponse = response.json().await.map_err(|e| {
            DomainError::GenerationService(format!("Failed to parse chat response: {e}"))
        })?;

        result
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| DomainError::GenerationService("chat response contained no content".into()))
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatRequestMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatRequestMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}
