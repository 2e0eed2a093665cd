//! Offline embedding provider based on feature hashing.
//!
//! Each lowercase alphanumeric token (and each adjacent token pair) is hashed
//! into one of `dimension` buckets with a hash-derived sign, then the vector
//! is L2-normalized. Same text, same vector, on every platform. Lexical
//! overlap is the only notion of similarity, which is enough for tests and
//! dry runs without network access.

use async_trait::async_trait;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::embedding::{EmbeddingInput, EmbeddingOutput, EmbeddingProvider};

/// Default vector width for the hashed provider.
pub const DEFAULT_HASHED_DIMENSION: usize = 512;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0100_0000_01b3;

/// Deterministic bag-of-words embedder.
#[derive(Debug, Clone)]
pub struct HashedEmbeddingProvider {
    dimension: usize,
}

impl HashedEmbeddingProvider {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    /// Embed synchronously. Empty or symbol-only text yields the zero vector.
    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        let tokens: Vec<String> = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
            .collect();

        for token in &tokens {
            self.accumulate(&mut vector, token.as_bytes(), 1.0);
        }
        for pair in tokens.windows(2) {
            let joined = format!("{} {}", pair[0], pair[1]);
            self.accumulate(&mut vector, joined.as_bytes(), 0.5);
        }

        let magnitude = vector.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();
        if magnitude > 1e-12 {
            for value in &mut vector {
                *value = (f64::from(*value) / magnitude) as f32;
            }
        }
        vector
    }

    fn accumulate(&self, vector: &mut [f32], feature: &[u8], weight: f32) {
        let hash = fnv1a(feature);
        let bucket = (hash % self.dimension as u64) as usize;
        let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
        vector[bucket] += sign * weight;
    }
}

impl Default for HashedEmbeddingProvider {
    fn default() -> Self {
        Self::new(DEFAULT_HASHED_DIMENSION)
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}

#[async_trait]
impl EmbeddingProvider for HashedEmbeddingProvider {
    fn name(&self) -> &'static str {
        "hashed"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> DomainResult<Vec<f32>> {
        Ok(self.embed_text(text))
    }

    async fn embed_batch(&self, inputs: &[EmbeddingInput]) -> DomainResult<Vec<EmbeddingOutput>> {
        if inputs.len() > self.max_batch_size() {
            return Err(DomainError::EmbeddingService(format!(
                "batch of {} exceeds limit {}",
                inputs.len(),
                self.max_batch_size()
            )));
        }
        Ok(inputs
            .iter()
            .map(|input| EmbeddingOutput {
                id: input.id.clone(),
                vector: self.embed_text(&input.text),
            })
            .collect())
    }

    fn max_batch_size(&self) -> usize {
        4096
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::cosine_similarity;

    #[test]
    fn test_deterministic() {
        let provider = HashedEmbeddingProvider::new(64);
        assert_eq!(provider.embed_text("Pick Color"), provider.embed_text("pick color"));
    }

    #[test]
    fn test_unit_length() {
        let v = HashedEmbeddingProvider::default().embed_text("choose a color from palette");
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        let v = HashedEmbeddingProvider::new(16).embed_text("  !! ");
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn test_overlap_scores_higher() {
        let provider = HashedEmbeddingProvider::default();
        let query = provider.embed_text("pick a color");
        let related = provider.embed_text("Extension: ColorPicker Command: Pick Color");
        let unrelated = provider.embed_text("Extension: Spotify Command: Play Song");
        assert!(cosine_similarity(&query, &related) > cosine_similarity(&query, &unrelated));
    }

    #[tokio::test]
    async fn test_embed_batch_keeps_ids() {
        let provider = HashedEmbeddingProvider::new(8);
        let outputs = provider
            .embed_batch(&[
                EmbeddingInput { id: "x".into(), text: "one".into() },
                EmbeddingInput { id: "y".into(), text: "two".into() },
            ])
            .await
            .unwrap();
        assert_eq!(outputs.len(), 2);
        assert_eq!(outputs[1].id, "y");
        assert_eq!(outputs[1].vector.len(), 8);
    }
}
