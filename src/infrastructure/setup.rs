//! Project initialization: the `.toolfinder/` directory, default config and
//! the bundled `rag-prompt` template.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::config::CONFIG_DIR;

/// Default configuration template content
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# toolfinder configuration
# Override settings by editing this file, adding .toolfinder/local.yaml, or
# setting environment variables with the TOOLFINDER_ prefix.
#
# Example environment variables:
#   export TOOLFINDER_RETRIEVAL__TOP_K=8
#   export TOOLFINDER_EMBEDDING__PROVIDER=hashed
#   export TOOLFINDER_LOGGING__LEVEL=debug

catalog:
  # JSON array produced by the extension scraper
  path: "extensions.json"

embedding:
  # openai or hashed (offline, lexical only)
  provider: "openai"
  model: "text-embedding-3-large"
  base_url: "https://api.openai.com/v1"
  dimension: 3072
  timeout_secs: 30
  # Maximum texts per embeddings request
  max_batch_size: 2048

generation:
  # openai or anthropic
  provider: "openai"
  model: "gpt-4o-mini"
  # 0.0 keeps answers deterministic
  temperature: 0.0
  max_tokens: 1024
  timeout_secs: 60

retrieval:
  # Documents handed to the model as context
  top_k: 4

template:
  name: "rag-prompt"
  version: "latest"
  # file (YAML under directory) or http (registry_url)
  source: "file"
  directory: ".toolfinder/templates"

logging:
  # Log level: trace, debug, info, warn, error
  level: "info"
  # Log format: json, pretty
  format: "json"
  # Rotation for log files when log_dir is set: daily, hourly, never
  rotation: "daily"
"#;

/// Bundled prompt template installed by `init`.
pub const DEFAULT_PROMPT_TEMPLATE: &str = include_str!("../../templates/rag-prompt.yaml");

/// Setup paths and directories
#[derive(Debug, Clone)]
pub struct SetupPaths {
    pub config_dir: PathBuf,
    pub config_file: PathBuf,
    pub templates_dir: PathBuf,
    pub template_file: PathBuf,
}

impl SetupPaths {
    /// Setup paths for the current directory
    pub fn new() -> Result<Self> {
        let current_dir = std::env::current_dir().context("Failed to get current directory")?;
        Ok(Self::in_dir(current_dir))
    }

    /// Setup paths rooted at `root`
    pub fn in_dir(root: impl AsRef<Path>) -> Self {
        let config_dir = root.as_ref().join(CONFIG_DIR);
        let templates_dir = config_dir.join("templates");
        Self {
            config_file: config_dir.join("config.yaml"),
            template_file: templates_dir.join("rag-prompt.yaml"),
            templates_dir,
            config_dir,
        }
    }

    /// Check if the project is already initialized
    pub fn is_initialized(&self) -> bool {
        self.config_file.exists() && self.template_file.exists()
    }
}

/// Files written by [`initialize`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InitReport {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

/// Create the config directory, default config and prompt template.
///
/// Existing files are left alone unless `force` is set.
pub fn initialize(paths: &SetupPaths, force: bool) -> Result<InitReport> {
    fs::create_dir_all(&paths.templates_dir).with_context(|| {
        format!("Failed to create {}", paths.templates_dir.display())
    })?;

    let mut report = InitReport::default();
    for (path, content) in [
        (&paths.config_file, DEFAULT_CONFIG_TEMPLATE),
        (&paths.template_file, DEFAULT_PROMPT_TEMPLATE),
    ] {
        if path.exists() && !force {
            report.skipped.push(path.clone());
            continue;
        }
        fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        report.written.push(path.clone());
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Config;
    use crate::infrastructure::config::ConfigLoader;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_template_is_valid() {
        let config: Config = serde_yaml::from_str(DEFAULT_CONFIG_TEMPLATE).unwrap();
        ConfigLoader::validate(&config).unwrap();
        assert_eq!(config.retrieval.top_k, 4);
    }

    #[test]
    fn test_initialize_writes_files() {
        let dir = TempDir::new().unwrap();
        let paths = SetupPaths::in_dir(dir.path());
        assert!(!paths.is_initialized());

        let report = initialize(&paths, false).unwrap();
        assert_eq!(report.written.len(), 2);
        assert!(paths.is_initialized());
    }

    #[test]
    fn test_initialize_keeps_existing_files_without_force() {
        let dir = TempDir::new().unwrap();
        let paths = SetupPaths::in_dir(dir.path());
        initialize(&paths, false).unwrap();
        fs::write(&paths.config_file, "retrieval:\n  top_k: 2\n").unwrap();

        let report = initialize(&paths, false).unwrap();
        assert_eq!(report.skipped.len(), 2);
        assert!(fs::read_to_string(&paths.config_file).unwrap().contains("top_k: 2"));

        let report = initialize(&paths, true).unwrap();
        assert_eq!(report.written.len(), 2);
        assert!(fs::read_to_string(&paths.config_file).unwrap().contains("top_k: 4"));
    }
}
