//! Implementation of the `toolfinder ask` command.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;

use crate::cli::output::{output, spinner, CommandOutput};
use crate::cli::types::parse_top_k;
use crate::domain::models::Config;
use crate::infrastructure::bootstrap::build_pipeline;
use crate::infrastructure::catalog::load_catalog;
use crate::services::frame_question;

#[derive(Args, Debug)]
pub struct AskArgs {
    /// What you want to do, e.g. "pick a color"
    pub task: String,

    /// Send the task to the model as-is instead of framing it as a catalog question
    #[arg(long)]
    pub raw: bool,

    /// Number of catalog entries handed to the model
    #[arg(short = 'k', long, value_parser = parse_top_k)]
    pub top_k: Option<usize>,

    /// Give up if the pipeline has not answered within this many seconds
    #[arg(long, value_name = "SECS")]
    pub deadline_secs: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct Source {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct AskOutput {
    pub query_id: String,
    pub question: String,
    pub answer: String,
    pub answered_at: DateTime<Utc>,
    pub sources: Vec<Source>,
}

impl CommandOutput for AskOutput {
    fn to_human(&self) -> String {
        self.answer.clone()
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: AskArgs, config: &Config, json_mode: bool) -> Result<()> {
    let records = load_catalog(&config.catalog.path).await?;

    let progress = spinner(format!("Indexing {} catalog entries", records.len()), json_mode);
    let built = build_pipeline(config, &records).await;
    progress.finish_and_clear();

    let mut pipeline = built?;
    if let Some(top_k) = args.top_k {
        pipeline = pipeline.with_top_k(top_k);
    }

    let question = if args.raw {
        args.task.clone()
    } else {
        frame_question(&args.task)
    };

    let progress = spinner("Asking the model", json_mode);
    let run = pipeline.run(question);
    let outcome = match args.deadline_secs {
        Some(secs) => tokio::time::timeout(Duration::from_secs(secs), run)
            .await
            .with_context(|| format!("No answer within the {secs}s deadline")),
        None => Ok(run.await),
    };
    progress.finish_and_clear();
    let answered = outcome??;

    output(
        &AskOutput {
            query_id: answered.id().to_string(),
            question: answered.question().to_string(),
            answer: answered.answer().to_string(),
            answered_at: answered.answered_at(),
            sources: answered
                .context()
                .iter()
                .map(|doc| Source {
                    title: doc.metadata.title.clone(),
                    url: doc.metadata.url.clone(),
                })
                .collect(),
        },
        json_mode,
    );
    Ok(())
}
