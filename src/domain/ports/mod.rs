//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines async trait interfaces that adapters must implement:
//! - EmbeddingProvider: text to vector
//! - ChatModel: prompt to answer text
//! - TemplateRegistry: named prompt templates
//! - VectorIndex: insert-once, query-by-text document index

pub mod embedding;
pub mod generation;
pub mod template_registry;
pub mod vector_index;

pub use embedding::{EmbeddingInput, EmbeddingOutput, EmbeddingProvider};
pub use generation::{ChatModel, GenerationParameters};
pub use template_registry::TemplateRegistry;
pub use vector_index::VectorIndex;
