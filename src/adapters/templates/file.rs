//! Template registry over a local directory of YAML files.
//!
//! `fetch(name, version)` looks for `<name>@<version>.yaml` first, then
//! `<name>.yaml`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};

use super::parse_template;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::PromptTemplate;
use crate::domain::ports::TemplateRegistry;

/// Loader for prompt templates stored on disk
pub struct FileTemplateRegistry {
    template_dir: PathBuf,
}

impl FileTemplateRegistry {
    pub fn new<P: AsRef<Path>>(template_dir: P) -> Self {
        Self {
            template_dir: template_dir.as_ref().to_path_buf(),
        }
    }

    fn candidates(&self, name: &str, version: &str) -> [PathBuf; 2] {
        [
            self.template_dir.join(format!("{name}@{version}.yaml")),
            self.template_dir.join(format!("{name}.yaml")),
        ]
    }

    /// Names of the `.yaml` templates in the directory, sorted.
    pub async fn list_templates(&self) -> DomainResult<Vec<String>> {
        let mut templates = Vec::new();
        let mut entries = match tokio::fs::read_dir(&self.template_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(templates),
            Err(e) => {
                return Err(DomainError::Configuration(format!(
                    "Failed to read template directory {}: {e}",
                    self.template_dir.display()
                )))
            }
        };

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| DomainError::Configuration(e.to_string()))?
        {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some("yaml") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    templates.push(stem.to_string());
                }
            }
        }
        templates.sort();
        Ok(templates)
    }
}

#[async_trait]
impl TemplateRegistry for FileTemplateRegistry {
    async fn fetch(&self, name: &str, version: &str) -> DomainResult<PromptTemplate> {
        for path in self.candidates(name, version) {
            debug!(path = %path.display(), "looking for prompt template");
            match tokio::fs::read_to_string(&path).await {
                Ok(content) => {
                    let template = parse_template(&content, name, version)?;
                    info!(template = %template.id(), path = %path.display(), "loaded prompt template");
                    return Ok(template);
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => {
                    return Err(DomainError::Configuration(format!(
                        "Failed to read template file {}: {e}",
                        path.display()
                    )))
                }
            }
        }

        Err(DomainError::Configuration(format!(
            "template '{name}@{version}' not found in {} (run `toolfinder init`)",
            self.template_dir.display()
        )))
    }
}
