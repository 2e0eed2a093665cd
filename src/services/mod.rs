//! Application services: document building, indexing, prompt composition,
//! answer generation and the pipeline that ties them together.

pub mod answer_generator;
pub mod document_builder;
pub mod embedding_index;
pub mod embedding_service;
pub mod prompt_composer;
pub mod rag_pipeline;

pub use answer_generator::AnswerGenerator;
pub use document_builder::DocumentBuilder;
pub use embedding_index::{cosine_similarity, EmbeddingIndex};
pub use embedding_service::{EmbeddingService, EmbeddingServiceConfig};
pub use prompt_composer::PromptComposer;
pub use rag_pipeline::{frame_question, RagPipeline};
