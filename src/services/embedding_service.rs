//! Embedding service for batch and real-time vector generation.
//!
//! Small batches are embedded text-by-text with bounded concurrency; larger
//! ones go through the provider's batch API, chunked to its per-request limit.

use std::sync::Arc;

use futures::stream::{self, StreamExt, TryStreamExt};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::EmbeddingConfig;
use crate::domain::ports::embedding::{EmbeddingInput, EmbeddingOutput, EmbeddingProvider};

/// Configuration for the embedding service.
#[derive(Debug, Clone)]
pub struct EmbeddingServiceConfig {
    /// Minimum number of items to trigger batch mode instead of individual calls.
    pub batch_threshold: usize,
    /// Maximum concurrent individual embedding calls (when below batch_threshold).
    pub max_concurrency: usize,
}

impl Default for EmbeddingServiceConfig {
    fn default() -> Self {
        Self {
            batch_threshold: 5,
            max_concurrency: 10,
        }
    }
}

impl From<&EmbeddingConfig> for EmbeddingServiceConfig {
    fn from(config: &EmbeddingConfig) -> Self {
        Self {
            batch_threshold: config.batch_threshold,
            max_concurrency: config.max_concurrency.max(1),
        }
    }
}

/// Embedding service that orchestrates embedding generation.
pub struct EmbeddingService {
    provider: Arc<dyn EmbeddingProvider>,
    config: EmbeddingServiceConfig,
}

impl EmbeddingService {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, config: EmbeddingServiceConfig) -> Self {
        Self { provider, config }
    }

    pub fn with_defaults(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self::new(provider, EmbeddingServiceConfig::default())
    }

    /// Provider name for diagnostics.
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Embedding dimension.
    pub fn dimension(&self) -> usize {
        self.provider.dimension()
    }

    /// Embed a single text.
    pub async fn embed_single(&self, text: &str) -> DomainResult<Vec<f32>> {
        self.provider.embed(text).await
    }

    /// Embed multiple texts, returning outputs in input order.
    ///
    /// Fails as a whole if any text fails; a partial index would silently
    /// hide records from retrieval.
    pub async fn embed_many(&self, inputs: &[EmbeddingInput]) -> DomainResult<Vec<EmbeddingOutput>> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let max_size = self.provider.max_batch_size();
        let outputs = if inputs.len() < self.config.batch_threshold || max_size == 0 {
            self.embed_individually(inputs).await?
        } else {
            let mut all_outputs = Vec::with_capacity(inputs.len());
            for chunk in inputs.chunks(max_size) {
                let chunk_outputs = self.provider.embed_batch(chunk).await?;
                all_outputs.extend(chunk_outputs);
            }
            all_outputs
        };

        if outputs.len() != inputs.len() {
            return Err(DomainError::EmbeddingService(format!(
                "provider '{}' returned {} embeddings for {} inputs",
                self.provider.name(),
                outputs.len(),
                inputs.len()
            )));
        }

        tracing::debug!(
            provider = self.provider.name(),
            inputs = inputs.len(),
            api_calls = Self::api_calls(inputs.len(), self.config.batch_threshold, max_size),
            "embedded batch"
        );

        Ok(outputs)
    }

    async fn embed_individually(&self, inputs: &[EmbeddingInput]) -> DomainResult<Vec<EmbeddingOutput>> {
        stream::iter(inputs.to_vec())
            .map(|input| async move {
                let vector = self.provider.embed(&input.text).await?;
                Ok::<_, DomainError>(EmbeddingOutput { id: input.id, vector })
            })
            .buffered(self.config.max_concurrency.max(1))
            .try_collect()
            .await
    }

    fn api_calls(items: usize, batch_threshold: usize, max_batch_size: usize) -> usize {
        if items < batch_threshold || max_batch_size == 0 {
            items
        } else {
            items.div_ceil(max_batch_size)
        }
    }
}
