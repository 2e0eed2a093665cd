//! Catalog records as produced by the extension scraper.
//!
//! Field names follow the scraper's JSON output (`extensionTitle`,
//! `extensionCommand`, ...). Plain snake_case names are accepted as aliases so
//! hand-written fixtures stay readable.

use serde::{Deserialize, Serialize};

/// A single command exposed by an extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogAction {
    /// Command name as listed in the store.
    #[serde(rename = "extensionCommand", alias = "name")]
    pub name: String,

    /// What the command does.
    #[serde(rename = "extensionCommandDescription", alias = "description")]
    pub description: String,
}

impl CatalogAction {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// One extension listed in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRecord {
    #[serde(rename = "extensionTitle", alias = "title")]
    pub title: String,

    #[serde(rename = "extensionDescription", alias = "description")]
    pub description: String,

    /// Canonical store URL.
    #[serde(rename = "extensionURL", alias = "url", default)]
    pub url: String,

    #[serde(rename = "extensionIconURL", alias = "icon_url", default)]
    pub icon_url: String,

    /// Name of the extension author.
    #[serde(rename = "extensionCreator", alias = "owner", default)]
    pub owner: String,

    #[serde(rename = "extensionCreatorURL", alias = "owner_url", default)]
    pub owner_url: String,

    /// Commands in listing order. Older scrapes omit the field entirely.
    #[serde(rename = "commands", alias = "actions", default)]
    pub actions: Vec<CatalogAction>,
}

impl CatalogRecord {
    /// Create a record with the required text fields; URLs default to empty.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        owner: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            url: String::new(),
            icon_url: String::new(),
            owner: owner.into(),
            owner_url: String::new(),
            actions: Vec::new(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_action(mut self, action: CatalogAction) -> Self {
        self.actions.push(action);
        self
    }
}
