//! Implementation of the `toolfinder init` command.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::cli::output::{output, success, CommandOutput};
use crate::infrastructure::setup::{initialize, SetupPaths};

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite existing config and template files
    #[arg(long, short)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
pub struct InitOutput {
    pub success: bool,
    pub message: String,
    pub written: Vec<String>,
    pub skipped: Vec<String>,
}

impl CommandOutput for InitOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![success(&self.message)];
        for path in &self.written {
            lines.push(format!("  wrote   {path}"));
        }
        for path in &self.skipped {
            lines.push(format!("  kept    {path} (use --force to overwrite)"));
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: InitArgs, json_mode: bool) -> Result<()> {
    let paths = SetupPaths::new()?;
    let root = paths
        .config_dir
        .parent()
        .map(std::path::Path::to_path_buf)
        .context("config directory has no parent")?;

    let report = tokio::task::spawn_blocking({
        let paths = paths.clone();
        move || initialize(&paths, args.force)
    })
    .await
    .context("init task panicked")??;

    let relative = |p: &std::path::PathBuf| p.strip_prefix(&root).unwrap_or(p.as_path()).display().to_string();
    let written: Vec<String> = report.written.iter().map(relative).collect();
    let skipped: Vec<String> = report.skipped.iter().map(relative).collect();

    let message = if written.is_empty() {
        "Project already initialized.".to_string()
    } else {
        "Project initialized.".to_string()
    };

    output(
        &InitOutput {
            success: true,
            message,
            written,
            skipped,
        },
        json_mode,
    );
    Ok(())
}
