//! Implementation of the `toolfinder catalog` command.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::cli::output::{output, table, truncate, CommandOutput};
use crate::domain::errors::PipelineError;
use crate::domain::models::{CatalogRecord, Config};
use crate::infrastructure::catalog::load_catalog;
use crate::services::DocumentBuilder;

#[derive(Args, Debug)]
pub struct CatalogArgs {
    /// List every record instead of only the totals
    #[arg(long, short)]
    pub list: bool,
}

#[derive(Debug, Serialize)]
pub struct CatalogEntry {
    pub title: String,
    pub owner: String,
    pub commands: usize,
}

#[derive(Debug, Serialize)]
pub struct CatalogOutput {
    pub path: String,
    pub records: usize,
    pub commands: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<CatalogEntry>,
}

impl CatalogOutput {
    fn new(path: &str, records: &[CatalogRecord], list: bool) -> Self {
        Self {
            path: path.to_string(),
            records: records.len(),
            commands: records.iter().map(|r| r.actions.len()).sum(),
            entries: if list {
                records
                    .iter()
                    .map(|r| CatalogEntry {
                        title: r.title.clone(),
                        owner: r.owner.clone(),
                        commands: r.actions.len(),
                    })
                    .collect()
            } else {
                Vec::new()
            },
        }
    }
}

impl CommandOutput for CatalogOutput {
    fn to_human(&self) -> String {
        let mut out = format!(
            "{}: {} extensions, {} commands",
            self.path, self.records, self.commands
        );
        if !self.entries.is_empty() {
            let mut t = table(&["Extension", "Creator", "Commands"]);
            for entry in &self.entries {
                t.add_row(vec![
                    truncate(&entry.title, 40),
                    truncate(&entry.owner, 24),
                    entry.commands.to_string(),
                ]);
            }
            out.push('\n');
            out.push_str(&t.to_string());
        }
        out
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: CatalogArgs, config: &Config, json_mode: bool) -> Result<()> {
    let records = load_catalog(&config.catalog.path).await?;

    // Same checks the index build applies.
    DocumentBuilder::new()
        .build_all(&records)
        .map_err(PipelineError::build)?;

    output(&CatalogOutput::new(&config.catalog.path, &records, args.list), json_mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::CatalogAction;

    #[test]
    fn test_counts() {
        let records = vec![
            CatalogRecord::new("A", "a", "ray").with_action(CatalogAction::new("x", "y")),
            CatalogRecord::new("B", "b", "ray"),
        ];
        let out = CatalogOutput::new("extensions.json", &records, false);
        assert_eq!(out.records, 2);
        assert_eq!(out.commands, 1);
        assert!(out.entries.is_empty());
        assert_eq!(out.to_human(), "extensions.json: 2 extensions, 1 commands");
    }

    #[test]
    fn test_list_entries() {
        let records = vec![CatalogRecord::new("A", "a", "ray")];
        let out = CatalogOutput::new("c.json", &records, true);
        assert_eq!(out.entries.len(), 1);
        assert!(out.to_human().contains("Creator"));
    }
}
