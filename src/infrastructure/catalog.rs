//! Catalog file loading.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::domain::models::CatalogRecord;

/// Read the scraper's JSON array of extension records.
///
/// A missing or malformed file is an error. An empty array is accepted and
/// yields an empty index.
pub async fn load_catalog(path: impl AsRef<Path>) -> Result<Vec<CatalogRecord>> {
    let path = path.as_ref();
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;

    let records = parse_catalog(&content)
        .with_context(|| format!("Failed to parse catalog file: {}", path.display()))?;

    if records.is_empty() {
        warn!(path = %path.display(), "catalog is empty");
    }
    info!(
        path = %path.display(),
        records = records.len(),
        actions = records.iter().map(|r| r.actions.len()).sum::<usize>(),
        "loaded catalog"
    );
    Ok(records)
}

/// Parse catalog JSON from a string.
pub fn parse_catalog(json: &str) -> serde_json::Result<Vec<CatalogRecord>> {
    serde_json::from_str(json)
}
