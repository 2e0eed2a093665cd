//! Prompt template registry adapters.

pub mod file;
pub mod http;

pub use file::FileTemplateRegistry;
pub use http::HttpTemplateRegistry;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::PromptTemplate;

/// Parse a YAML template document and check it against the requested
/// name and version. `latest` accepts any version.
pub fn parse_template(yaml: &str, name: &str, version: &str) -> DomainResult<PromptTemplate> {
    let template: PromptTemplate = serde_yaml::from_str(yaml).map_err(|e| {
        DomainError::Configuration(format!("Failed to parse template '{name}': {e}"))
    })?;

    if template.name != name {
        return Err(DomainError::Configuration(format!(
            "template file declares name '{}', expected '{name}'",
            template.name
        )));
    }
    if version != "latest" && template.version != version {
        return Err(DomainError::Configuration(format!(
            "template '{name}' is at version '{}', expected '{version}'",
            template.version
        )));
    }

    template.validate()?;
    Ok(template)
}
