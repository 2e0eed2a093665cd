//! Domain layer for toolfinder
//!
//! Catalog records, documents, prompt templates, per-query state, and the
//! port traits that adapters implement.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult, PipelineError, PipelineResult, PipelineStage};
