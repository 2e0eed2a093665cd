//! Adapters for external systems: embedding providers, chat models and
//! template registries.

pub mod embeddings;
pub mod generation;
pub mod templates;
