//! Wiring from [`Config`] to a ready pipeline.
//!
//! Everything here runs once at startup. Any failure is fatal to the
//! invocation: no provider fallback, no partial index.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::adapters::embeddings::{HashedEmbeddingProvider, OpenAiEmbeddingConfig, OpenAiEmbeddingProvider};
use crate::adapters::generation::{AnthropicChatConfig, AnthropicChatModel, OpenAiChatConfig, OpenAiChatModel};
use crate::adapters::templates::{FileTemplateRegistry, HttpTemplateRegistry};
use crate::domain::errors::{PipelineError, PipelineResult};
use crate::domain::models::{
    CatalogRecord, Config, EmbeddingConfig, EmbeddingProviderKind, GenerationConfig,
    GenerationProviderKind, PromptTemplate, TemplateConfig, TemplateSource,
};
use crate::domain::ports::{ChatModel, EmbeddingProvider, GenerationParameters, TemplateRegistry, VectorIndex};
use crate::services::{
    AnswerGenerator, DocumentBuilder, EmbeddingIndex, EmbeddingService, EmbeddingServiceConfig,
    PromptComposer, RagPipeline,
};

/// Construct the configured embedding provider.
pub fn embedding_provider(config: &EmbeddingConfig) -> Result<Arc<dyn EmbeddingProvider>> {
    let provider: Arc<dyn EmbeddingProvider> = match config.provider {
        EmbeddingProviderKind::OpenAi => Arc::new(
            OpenAiEmbeddingProvider::new(OpenAiEmbeddingConfig::from(config))
                .context("Failed to create OpenAI embedding provider")?,
        ),
        EmbeddingProviderKind::Hashed => Arc::new(HashedEmbeddingProvider::new(config.dimension)),
    };
    Ok(provider)
}

/// Construct the configured chat model.
pub fn chat_model(config: &GenerationConfig) -> Result<Arc<dyn ChatModel>> {
    let model: Arc<dyn ChatModel> = match config.provider {
        GenerationProviderKind::OpenAi => Arc::new(
            OpenAiChatModel::new(OpenAiChatConfig::from(config))
                .context("Failed to create OpenAI chat model")?,
        ),
        GenerationProviderKind::Anthropic => Arc::new(
            AnthropicChatModel::new(AnthropicChatConfig::from(config))
                .context("Failed to create Anthropic chat model")?,
        ),
    };
    Ok(model)
}

/// Construct the configured template registry.
pub fn template_registry(config: &TemplateConfig) -> Result<Arc<dyn TemplateRegistry>> {
    let registry: Arc<dyn TemplateRegistry> = match config.source {
        TemplateSource::File => Arc::new(FileTemplateRegistry::new(&config.directory)),
        TemplateSource::Http => {
            let url = config
                .registry_url
                .as_deref()
                .context("template.registry_url is required for the http source")?;
            Arc::new(HttpTemplateRegistry::new(url, 30).context("Failed to create template registry client")?)
        }
    };
    Ok(registry)
}

/// Fetch and validate the prompt template named in the config.
pub async fn load_template(config: &TemplateConfig) -> Result<PromptTemplate> {
    let registry = template_registry(config)?;
    registry
        .fetch(&config.name, &config.version)
        .await
        .with_context(|| format!("Failed to load prompt template '{}@{}'", config.name, config.version))
}

/// Build documents from `records` and embed them into a fresh index.
pub async fn build_index(
    records: &[CatalogRecord],
    embeddings: Arc<EmbeddingService>,
) -> PipelineResult<EmbeddingIndex> {
    let documents = DocumentBuilder::new()
        .build_all(records)
        .map_err(PipelineError::build)?;

    let mut index = EmbeddingIndex::new(embeddings);
    index
        .add_documents(documents)
        .await
        .map_err(PipelineError::build)?;
    Ok(index)
}

/// Assemble a pipeline from an already-built index.
pub fn assemble_pipeline(
    config: &Config,
    index: Arc<dyn VectorIndex>,
    template: PromptTemplate,
    model: Arc<dyn ChatModel>,
) -> Result<RagPipeline> {
    let composer = PromptComposer::new(template).context("Prompt template failed validation")?;
    let generator = AnswerGenerator::new(model, GenerationParameters::from(&config.generation));
    Ok(RagPipeline::new(index, composer, generator, config.retrieval.top_k))
}

/// Embedding service for `config`.
pub fn embedding_service(config: &EmbeddingConfig) -> Result<Arc<EmbeddingService>> {
    Ok(Arc::new(EmbeddingService::new(
        embedding_provider(config)?,
        EmbeddingServiceConfig::from(config),
    )))
}

/// Template, providers, index and pipeline in startup order.
pub async fn build_pipeline(config: &Config, records: &[CatalogRecord]) -> Result<RagPipeline> {
    let template = load_template(&config.template).await?;
    let model = chat_model(&config.generation)?;
    let embeddings = embedding_service(&config.embedding)?;

    let index = build_index(records, embeddings).await?;
    info!(
        documents = index.len(),
        template = %template.id(),
        model = %config.generation.model,
        top_k = config.retrieval.top_k,
        "pipeline ready"
    );

    assemble_pipeline(config, Arc::new(index), template, model)
}
