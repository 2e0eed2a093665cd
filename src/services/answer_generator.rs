//! Answer generation over a chat model port.

use std::sync::Arc;
use std::time::Instant;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{GenerationConfig, PromptMessage};
use crate::domain::ports::{ChatModel, GenerationParameters};

impl From<&GenerationConfig> for GenerationParameters {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

/// Sends composed prompts to the configured chat model.
///
/// One request per call, no retry. The caller decides what to do on failure.
pub struct AnswerGenerator {
    model: Arc<dyn ChatModel>,
    parameters: GenerationParameters,
}

impl AnswerGenerator {
    pub fn new(model: Arc<dyn ChatModel>, parameters: GenerationParameters) -> Self {
        Self { model, parameters }
    }

    pub fn parameters(&self) -> &GenerationParameters {
        &self.parameters
    }

    pub async fn generate(&self, prompt: &PromptMessage) -> DomainResult<String> {
        let started = Instant::now();
        tracing::debug!(
            provider = self.model.provider_id(),
            model = %self.parameters.model,
            temperature = self.parameters.temperature,
            template = %prompt.template,
            "requesting answer"
        );

        let answer = self
            .model
            .complete(prompt, &self.parameters)
            .await
            .map_err(|err| match err {
                DomainError::GenerationService(_) => err,
                other => DomainError::GenerationService(other.to_string()),
            })?;

        tracing::info!(
            provider = self.model.provider_id(),
            model = %self.parameters.model,
            elapsed_ms = started.elapsed().as_millis() as u64,
            answer_chars = answer.len(),
            "answer generated"
        );
        Ok(answer)
    }
}
