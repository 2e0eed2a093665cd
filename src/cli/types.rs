//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::commands::{ask::AskArgs, catalog::CatalogArgs, init::InitArgs, search::SearchArgs};

#[derive(Parser, Debug)]
#[command(name = "toolfinder")]
#[command(about = "Find the extension and command that does what you need", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Load configuration from this file instead of .toolfinder/
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Catalog JSON file (overrides catalog.path)
    #[arg(long, global = true, value_name = "PATH")]
    pub catalog: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write .toolfinder/config.yaml and the default prompt template
    Init(InitArgs),

    /// Ask which extension and command performs a task
    Ask(AskArgs),

    /// Show the catalog entries closest to a query, without generation
    Search(SearchArgs),

    /// Load and validate the catalog
    Catalog(CatalogArgs),
}

/// Parse a retrieval depth of at least 1.
pub fn parse_top_k(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(k) => Ok(k),
        Err(e) => Err(e.to_string()),
    }
}
