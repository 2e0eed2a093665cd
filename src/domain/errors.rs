//! Domain errors for the toolfinder pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Domain-level errors that can occur while building the index or answering a query.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Malformed catalog record, duplicate title, or empty question.
    #[error("Input validation failed: {0}")]
    InputValidation(String),

    /// The embedding provider failed (network, quota, or model error).
    #[error("Embedding service error: {0}")]
    EmbeddingService(String),

    /// A prompt template is missing a required slot or could not be bound.
    #[error("Template binding error: {0}")]
    TemplateBinding(String),

    /// The chat model failed, timed out, or rate limited the request.
    #[error("Generation service error: {0}")]
    GenerationService(String),

    #[error("Invalid state transition from {from} to {to}: {reason}")]
    InvalidStateTransition { from: String, to: String, reason: String },

    #[error("Configuration error: {0}")]
    Configuration(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::InputValidation(err.to_string())
    }
}

/// The stage of a pipeline run that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStage {
    Build,
    Retrieve,
    Generate,
}

impl PipelineStage {
    pub const fn as_str(self) -> &'static str {
        match self {
            PipelineStage::Build => "build",
            PipelineStage::Retrieve => "retrieve",
            PipelineStage::Generate => "generate",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A domain error tagged with the pipeline stage that raised it.
#[derive(Debug, Error)]
#[error("{stage} stage failed: {source}")]
pub struct PipelineError {
    pub stage: PipelineStage,
    #[source]
    pub source: DomainError,
}

impl PipelineError {
    pub fn new(stage: PipelineStage, source: DomainError) -> Self {
        Self { stage, source }
    }

    pub fn build(source: DomainError) -> Self {
        Self::new(PipelineStage::Build, source)
    }

    pub fn retrieve(source: DomainError) -> Self {
        Self::new(PipelineStage::Retrieve, source)
    }

    pub fn generate(source: DomainError) -> Self {
        Self::new(PipelineStage::Generate, source)
    }

    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    pub fn inner(&self) -> &DomainError {
        &self.source
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;
