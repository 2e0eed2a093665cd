pub mod catalog;
pub mod config;
pub mod document;
pub mod prompt;
pub mod query;

pub use catalog::{CatalogAction, CatalogRecord};
pub use config::{
    CatalogConfig, Config, EmbeddingConfig, EmbeddingProviderKind, GenerationConfig,
    GenerationProviderKind, LoggingConfig, RetrievalConfig, TemplateConfig, TemplateSource,
    DEFAULT_TOP_K,
};
pub use document::{Document, DocumentMetadata, IndexedEntry, ScoredDocument};
pub use prompt::{
    ChatMessage, MessageRole, PromptMessage, PromptTemplate, TemplateMessage, CONTEXT_SLOT,
    QUESTION_SLOT,
};
pub use query::{AnsweredQuery, PendingQuery, QueryStage, QueryState, RetrievedQuery};
