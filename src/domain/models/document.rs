//! Searchable documents derived from catalog records.

use serde::{Deserialize, Serialize};

/// Metadata carried alongside a document's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Title of the source record. Unique within one index build.
    pub title: String,
    pub url: String,
    pub owner: String,
}

/// A flattened, searchable rendering of one catalog record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub content: String,
    pub metadata: DocumentMetadata,
}

impl Document {
    pub fn new(content: impl Into<String>, metadata: DocumentMetadata) -> Self {
        Self {
            content: content.into(),
            metadata,
        }
    }

    pub fn title(&self) -> &str {
        &self.metadata.title
    }
}

/// A document together with its cached embedding.
///
/// Entries are created once when a document is added to the index and never
/// mutated afterwards.
#[derive(Debug, Clone)]
pub struct IndexedEntry {
    document: Document,
    embedding: Vec<f32>,
}

impl IndexedEntry {
    pub fn new(document: Document, embedding: Vec<f32>) -> Self {
        Self {
            document,
            embedding,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn embedding(&self) -> &[f32] {
        &self.embedding
    }
}

/// A search hit: the document and its cosine similarity to the query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredDocument {
    pub document: Document,
    pub similarity: f32,
}
