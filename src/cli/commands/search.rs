//! Implementation of the `toolfinder search` command.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::cli::output::{output, spinner, table, truncate, CommandOutput};
use crate::cli::types::parse_top_k;
use crate::domain::errors::PipelineError;
use crate::domain::models::{Config, ScoredDocument};
use crate::domain::ports::VectorIndex;
use crate::infrastructure::bootstrap::{build_index, embedding_service};
use crate::infrastructure::catalog::load_catalog;

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Free-text query
    pub query: String,

    /// Number of results (defaults to retrieval.top_k)
    #[arg(short = 'k', long, value_parser = parse_top_k)]
    pub top_k: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SearchHit {
    pub rank: usize,
    pub title: String,
    pub owner: String,
    pub url: String,
    pub similarity: f32,
}

#[derive(Debug, Serialize)]
pub struct SearchOutput {
    pub query: String,
    pub hits: Vec<SearchHit>,
}

impl SearchOutput {
    fn new(query: String, scored: Vec<ScoredDocument>) -> Self {
        let hits = scored
            .into_iter()
            .enumerate()
            .map(|(i, hit)| SearchHit {
                rank: i + 1,
                title: hit.document.metadata.title,
                owner: hit.document.metadata.owner,
                url: hit.document.metadata.url,
                similarity: hit.similarity,
            })
            .collect();
        Self { query, hits }
    }
}

impl CommandOutput for SearchOutput {
    fn to_human(&self) -> String {
        if self.hits.is_empty() {
            return "No catalog entries indexed.".to_string();
        }
        let mut t = table(&["#", "Extension", "Creator", "Score", "URL"]);
        for hit in &self.hits {
            t.add_row(vec![
                hit.rank.to_string(),
                truncate(&hit.title, 40),
                truncate(&hit.owner, 24),
                format!("{:.3}", hit.similarity),
                hit.url.clone(),
            ]);
        }
        t.to_string()
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: SearchArgs, config: &Config, json_mode: bool) -> Result<()> {
    let records = load_catalog(&config.catalog.path).await?;

    let progress = spinner(format!("Indexing {} catalog entries", records.len()), json_mode);
    let built = async {
        let service = embedding_service(&config.embedding)?;
        anyhow::Ok(build_index(&records, service).await?)
    }
    .await;
    progress.finish_and_clear();
    let index = built?;

    let k = args.top_k.unwrap_or(config.retrieval.top_k);
    let scored = index
        .similarity_search_with_scores(&args.query, k)
        .await
        .map_err(PipelineError::retrieve)?;

    output(&SearchOutput::new(args.query, scored), json_mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Document, DocumentMetadata};

    #[test]
    fn test_output_ranks_from_one() {
        let doc = Document::new(
            "Extension: ColorPicker",
            DocumentMetadata {
                title: "ColorPicker".into(),
                url: "https://example.com/cp".into(),
                owner: "ray".into(),
            },
        );
        let out = SearchOutput::new(
            "pick".into(),
            vec![ScoredDocument { document: doc, similarity: 0.5 }],
        );
        assert_eq!(out.hits[0].rank, 1);
        assert!(out.to_human().contains("0.500"));
        assert_eq!(out.to_json()["hits"][0]["title"], "ColorPicker");
    }
}
