//! Property-based tests for similarity search invariants
//!
//! Tests the following properties:
//! 1. Result count: search returns min(k, indexed) documents
//! 2. Ordering: similarities are non-increasing
//! 3. Self-retrieval: a document's own content ranks it first
//! 4. Determinism: the same query returns the same ranking

mod common;

use std::sync::Arc;

use proptest::prelude::*;
use tokio_test::block_on;
use toolfinder::adapters::embeddings::HashedEmbeddingProvider;
use toolfinder::domain::models::{Document, DocumentMetadata};
use toolfinder::domain::ports::VectorIndex;
use toolfinder::services::{EmbeddingIndex, EmbeddingService};

/// Lowercase word-like tokens.
fn word_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z]{3,10}").expect("Valid regex")
}

fn corpus_strategy() -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::vec(prop::collection::vec(word_strategy(), 3..12), 1..12)
}

fn documents(corpus: &[Vec<String>]) -> Vec<Document> {
    corpus
        .iter()
        .enumerate()
        .map(|(i, words)| {
            Document::new(
                format!("doc{i} {}", words.join(" ")),
                DocumentMetadata {
                    title: format!("Extension {i}"),
                    url: String::new(),
                    owner: "proptest".to_string(),
                },
            )
        })
        .collect()
}

async fn index_for(corpus: &[Vec<String>]) -> EmbeddingIndex {
    let provider = Arc::new(HashedEmbeddingProvider::new(common::TEST_DIMENSION));
    let mut index = EmbeddingIndex::new(Arc::new(EmbeddingService::with_defaults(provider)));
    index.add_documents(documents(corpus)).await.unwrap();
    index
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property 1: at most k results, and exactly k when enough are indexed
    #[test]
    fn proptest_result_count(corpus in corpus_strategy(), query in word_strategy(), k in 0usize..16) {
        let hits = block_on(async {
            let index = index_for(&corpus).await;
            index.similarity_search_with_scores(&query, k).await.unwrap()
        });
        prop_assert_eq!(hits.len(), k.min(corpus.len()));
    }

    /// Property 2: similarities are sorted from best to worst
    #[test]
    fn proptest_results_non_increasing(corpus in corpus_strategy(), query in word_strategy()) {
        let hits = block_on(async {
            let index = index_for(&corpus).await;
            index.similarity_search_with_scores(&query, corpus.len()).await.unwrap()
        });
        for pair in hits.windows(2) {
            prop_assert!(pair[0].similarity >= pair[1].similarity);
        }
        for hit in &hits {
            prop_assert!((-1.0..=1.0).contains(&hit.similarity));
        }
    }

    /// Property 3: querying with a document's exact content retrieves it first
    #[test]
    fn proptest_self_retrieval(corpus in corpus_strategy(), pick in any::<prop::sample::Index>()) {
        let docs = documents(&corpus);
        let target = &docs[pick.index(docs.len())];

        let hits = block_on(async {
            let index = index_for(&corpus).await;
            index.similarity_search_with_scores(&target.content, 1).await.unwrap()
        });

        prop_assert_eq!(hits.len(), 1);
        prop_assert!((hits[0].similarity - 1.0).abs() < 1e-4);
        prop_assert_eq!(hits[0].document.title(), target.title());
    }

    /// Property 4: the same query ranks identically on repeat
    #[test]
    fn proptest_search_deterministic(corpus in corpus_strategy(), query in word_strategy()) {
        let (first, second) = block_on(async {
            let index = index_for(&corpus).await;
            let first = index.similarity_search(&query, 5).await.unwrap();
            let second = index.similarity_search(&query, 5).await.unwrap();
            (first, second)
        });
        let titles = |docs: &[Document]| docs.iter().map(|d| d.title().to_string()).collect::<Vec<_>>();
        prop_assert_eq!(titles(&first), titles(&second));
    }
}
