//! Chat model port used by the answer generator.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::PromptMessage;

/// Sampling parameters passed with every generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParameters {
    /// Model identifier, e.g. `gpt-4o-mini`.
    pub model: String,
    /// Sampling temperature. The pipeline keeps this at 0.0.
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Port trait for chat model backends.
///
/// Implementations perform exactly one request per call and never retry;
/// provider errors, timeouts and rate limits surface as
/// `DomainError::GenerationService`.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Identifier for logs, e.g. "openai" or "anthropic".
    fn provider_id(&self) -> &'static str;

    /// Send the prompt and return the model's text reply.
    async fn complete(
        &self,
        prompt: &PromptMessage,
        parameters: &GenerationParameters,
    ) -> DomainResult<String>;
}
