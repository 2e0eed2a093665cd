//! Catalog record to searchable document conversion.
//!
//! Rendering order is title, description, owner, then each command. The
//! chat model reads this text as grounding context, so the layout must stay
//! stable across a single index build. Older scrapes carry no creator; the
//! owner line is then rendered empty.

use std::collections::HashSet;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{CatalogAction, CatalogRecord, Document, DocumentMetadata};

/// Stateless converter from [`CatalogRecord`] to [`Document`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentBuilder;

impl DocumentBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Render one record. Fails if a required text field is blank.
    pub fn build(&self, record: &CatalogRecord) -> DomainResult<Document> {
        validate_record(record)?;

        let commands = record
            .actions
            .iter()
            .map(render_action)
            .collect::<Vec<_>>()
            .join("\n");

        let content = format!(
            "Extension: {}\nDescription: {}\nCreator: {}\nCommands:\n{}",
            record.title, record.description, record.owner, commands
        );

        Ok(Document::new(
            content,
            DocumentMetadata {
                title: record.title.clone(),
                url: record.url.clone(),
                owner: record.owner.clone(),
            },
        ))
    }

    /// Render a whole catalog, rejecting it if any record is invalid or two
    /// records share a title.
    ///
    /// Invalid records fail the batch rather than being skipped: a dropped
    /// record would look exactly like an irrelevant one at query time.
    pub fn build_all(&self, records: &[CatalogRecord]) -> DomainResult<Vec<Document>> {
        let mut seen = HashSet::with_capacity(records.len());
        let mut documents = Vec::with_capacity(records.len());

        for (position, record) in records.iter().enumerate() {
            let document = self.build(record).map_err(|err| match err {
                DomainError::InputValidation(reason) => {
                    DomainError::InputValidation(format!("catalog record #{position}: {reason}"))
                }
                other => other,
            })?;

            if !seen.insert(document.metadata.title.clone()) {
                return Err(DomainError::InputValidation(format!(
                    "catalog record #{position}: duplicate title '{}'",
                    document.metadata.title
                )));
            }
            documents.push(document);
        }

        tracing::debug!(documents = documents.len(), "built catalog documents");
        Ok(documents)
    }
}

fn render_action(action: &CatalogAction) -> String {
    format!("Command: {}\nDescription: {}", action.name, action.description)
}

fn validate_record(record: &CatalogRecord) -> DomainResult<()> {
    let required = [("title", &record.title), ("description", &record.description)];
    for (field, value) in required {
        if value.trim().is_empty() {
            let title = if record.title.trim().is_empty() {
                "<untitled>"
            } else {
                record.title.as_str()
            };
            return Err(DomainError::InputValidation(format!(
                "record '{title}' is missing required field '{field}'"
            )));
        }
    }

    if let Some(index) = record.actions.iter().position(|a| a.name.trim().is_empty()) {
        return Err(DomainError::InputValidation(format!(
            "record '{}' has a command without a name at position {index}",
            record.title
        )));
    }

    Ok(())
}
