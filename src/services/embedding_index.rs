//! In-memory embedding index with brute-force cosine search.
//!
//! A linear scan over cached embeddings is fast enough for catalogs of a few
//! thousand entries. Ranking uses a stable sort, so documents with equal
//! similarity keep their insertion order.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;

use super::embedding_service::EmbeddingService;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Document, IndexedEntry, ScoredDocument};
use crate::domain::ports::embedding::EmbeddingInput;
use crate::domain::ports::VectorIndex;

/// Append-only document index backed by an embedding service.
pub struct EmbeddingIndex {
    embeddings: Arc<EmbeddingService>,
    entries: Vec<IndexedEntry>,
    titles: HashSet<String>,
}

impl EmbeddingIndex {
    pub fn new(embeddings: Arc<EmbeddingService>) -> Self {
        Self {
            embeddings,
            entries: Vec::new(),
            titles: HashSet::new(),
        }
    }

    /// Indexed entries in insertion order.
    pub fn entries(&self) -> &[IndexedEntry] {
        &self.entries
    }

    fn dimension(&self) -> Option<usize> {
        self.entries.first().map(|entry| entry.embedding().len())
    }

    /// Rank cached entries against an already-computed query vector.
    pub fn rank(&self, query_embedding: &[f32], k: usize) -> DomainResult<Vec<ScoredDocument>> {
        if k == 0 || self.entries.is_empty() {
            return Ok(Vec::new());
        }

        if let Some(dimension) = self.dimension() {
            if query_embedding.len() != dimension {
                return Err(DomainError::EmbeddingService(format!(
                    "query embedding has dimension {}, index uses {}",
                    query_embedding.len(),
                    dimension
                )));
            }
        }
        if query_embedding.iter().any(|x| !x.is_finite()) {
            return Err(DomainError::EmbeddingService(
                "query embedding contains non-finite values".to_string(),
            ));
        }

        let mut scored: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(position, entry)| (position, cosine_similarity(query_embedding, entry.embedding())))
            .collect();

        // Stable: equal scores keep insertion order.
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(position, similarity)| ScoredDocument {
                document: self.entries[position].document().clone(),
                similarity,
            })
            .collect())
    }
}

#[async_trait]
impl VectorIndex for EmbeddingIndex {
    async fn add_documents(&mut self, documents: Vec<Document>) -> DomainResult<()> {
        if documents.is_empty() {
            return Ok(());
        }

        let mut batch_titles = HashSet::with_capacity(documents.len());
        for document in &documents {
            let title = document.title();
            if self.titles.contains(title) || !batch_titles.insert(title) {
                return Err(DomainError::InputValidation(format!(
                    "document title '{title}' is already indexed"
                )));
            }
        }

        let inputs: Vec<EmbeddingInput> = documents
            .iter()
            .map(|doc| EmbeddingInput {
                id: doc.metadata.title.clone(),
                text: doc.content.clone(),
            })
            .collect();

        let outputs = self.embeddings.embed_many(&inputs).await?;

        let expected = self.dimension().or_else(|| outputs.first().map(|o| o.vector.len()));
        if let Some(bad) = outputs
            .iter()
            .find(|o| o.vector.is_empty() || Some(o.vector.len()) != expected)
        {
            return Err(DomainError::EmbeddingService(format!(
                "embedding for '{}' has dimension {}, expected {}",
                bad.id,
                bad.vector.len(),
                expected.unwrap_or_default()
            )));
        }
        if let Some(bad) = outputs.iter().find(|o| o.vector.iter().any(|x| !x.is_finite())) {
            return Err(DomainError::EmbeddingService(format!(
                "embedding for '{}' contains non-finite values",
                bad.id
            )));
        }

        let added = documents.len();
        for (document, output) in documents.into_iter().zip(outputs) {
            self.titles.insert(document.metadata.title.clone());
            self.entries.push(IndexedEntry::new(document, output.vector));
        }

        tracing::info!(
            added,
            total = self.entries.len(),
            provider = self.embeddings.provider_name(),
            "indexed documents"
        );
        Ok(())
    }

    async fn similarity_search_with_scores(
        &self,
        query: &str,
        k: usize,
    ) -> DomainResult<Vec<ScoredDocument>> {
        if k == 0 {
            return Ok(Vec::new());
        }

        let query_embedding = self.embeddings.embed_single(query).await?;
        let hits = self.rank(&query_embedding, k)?;

        tracing::debug!(k, hits = hits.len(), "similarity search complete");
        Ok(hits)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Cosine similarity in `[-1, 1]`; zero-magnitude, mismatched or overflowing
/// vectors score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }

    let similarity = dot / (mag_a * mag_b);
    if similarity.is_finite() {
        similarity.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}
