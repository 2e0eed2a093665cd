//! Command-line interface.

pub mod commands;
pub mod output;
pub mod types;

pub use types::{Cli, Commands};

use anyhow::{Context, Result};

use crate::domain::errors::PipelineError;
use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::logging::{LogConfig, LoggerImpl};

/// Load configuration from `--config` or the project hierarchy, then apply
/// command-line overrides.
pub fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match cli.config {
        Some(ref path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };
    if let Some(ref catalog) = cli.catalog {
        config.catalog.path = catalog.display().to_string();
    }
    Ok(config)
}

/// Dispatch a parsed command line.
pub async fn run(cli: Cli) -> Result<()> {
    if let Commands::Init(args) = cli.command {
        let _logger = LoggerImpl::init(&LogConfig::default())?;
        return commands::init::execute(args, cli.json).await;
    }

    let config = load_config(&cli)?;
    let log_config = LogConfig::try_from(&config.logging)
        .map_err(anyhow::Error::msg)
        .context("Invalid logging configuration")?;
    let _logger = LoggerImpl::init(&log_config)?;

    match cli.command {
        Commands::Ask(args) => commands::ask::execute(args, &config, cli.json).await,
        Commands::Search(args) => commands::search::execute(args, &config, cli.json).await,
        Commands::Catalog(args) => commands::catalog::execute(args, &config, cli.json).await,
        Commands::Init(_) => Ok(()),
    }
}

/// Print `err` to stderr (or as JSON on stdout) and exit with status 1.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    let stage = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<PipelineError>())
        .map(|pipeline| pipeline.stage().as_str());

    if json_mode {
        let body = serde_json::json!({
            "success": false,
            "error": format!("{err:#}"),
            "stage": stage,
        });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("{} {err:#}", console::style("Error:").red().bold());
    }
    std::process::exit(1);
}
