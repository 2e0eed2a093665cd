//! Prompt template registry port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::PromptTemplate;

/// Source of named, versioned prompt templates.
///
/// Called once at startup; the returned template is immutable for the run.
#[async_trait]
pub trait TemplateRegistry: Send + Sync {
    /// Fetch `name` at `version`. Implementations validate the template's
    /// slots before returning it.
    async fn fetch(&self, name: &str, version: &str) -> DomainResult<PromptTemplate>;
}
