//! toolfinder: retrieval-augmented answers to "which extension and command
//! lets me do X?" over a scraped extension catalog.
//!
//! Catalog records become text documents, documents are embedded into an
//! in-memory similarity index once at startup, and each question runs a
//! two-stage pipeline: retrieve the closest documents, then ask a chat model
//! to answer from them.
//!
//! ```no_run
//! # async fn demo() -> anyhow::Result<()> {
//! use toolfinder::infrastructure::{bootstrap, catalog, config::ConfigLoader};
//!
//! let config = ConfigLoader::load()?;
//! let records = catalog::load_catalog(&config.catalog.path).await?;
//! let pipeline = bootstrap::build_pipeline(&config, &records).await?;
//! let answer = pipeline.ask("Which extension picks a color?").await?;
//! println!("{answer}");
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

pub use domain::errors::{DomainError, DomainResult, PipelineError, PipelineResult, PipelineStage};
pub use domain::models::{
    AnsweredQuery, CatalogAction, CatalogRecord, Config, Document, DocumentMetadata, PendingQuery,
    PromptMessage, PromptTemplate, QueryState, RetrievedQuery,
};
pub use services::{frame_question, RagPipeline};
