//! Vector index port.
//!
//! The contract is insert-once, query-by-text, ranked documents out. The
//! in-memory brute-force index implements it today; an approximate
//! nearest-neighbour structure can replace it without touching the pipeline.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Document, ScoredDocument};

#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Embed and append documents. Must finish before any search runs.
    async fn add_documents(&mut self, documents: Vec<Document>) -> DomainResult<()>;

    /// Top-`k` documents by descending cosine similarity, with scores.
    async fn similarity_search_with_scores(
        &self,
        query: &str,
        k: usize,
    ) -> DomainResult<Vec<ScoredDocument>>;

    /// Top-`k` documents by descending cosine similarity.
    async fn similarity_search(&self, query: &str, k: usize) -> DomainResult<Vec<Document>> {
        Ok(self
            .similarity_search_with_scores(query, k)
            .await?
            .into_iter()
            .map(|hit| hit.document)
            .collect())
    }

    /// Number of indexed documents.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
