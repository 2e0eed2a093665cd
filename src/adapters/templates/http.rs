//! Template registry served over HTTP.
//!
//! `GET {base_url}/templates/{name}/{version}` must return the template as
//! YAML (JSON is valid YAML, so either works).

use std::time::Duration;

use async_trait::async_trait;

use super::parse_template;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::PromptTemplate;
use crate::domain::ports::TemplateRegistry;
use crate::infrastructure::logging::scrub;

pub struct HttpTemplateRegistry {
    base_url: String,
    client: reqwest::Client,
}

impl HttpTemplateRegistry {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> DomainResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| DomainError::Configuration(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[async_trait]
impl TemplateRegistry for HttpTemplateRegistry {
    async fn fetch(&self, name: &str, version: &str) -> DomainResult<PromptTemplate> {
        let url = format!("{}/templates/{name}/{version}", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DomainError::Configuration(format!("Template fetch from {url} failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::Configuration(format!(
                "Template registry returned {status} for '{name}@{version}': {}",
                scrub(&body)
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| DomainError::Configuration(format!("Failed to read template body: {e}")))?;

        let template = parse_template(&body, name, version)?;
        tracing::info!(template = %template.id(), registry = %self.base_url, "fetched prompt template");
        Ok(template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[tokio::test]
    async fn test_fetch_template() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/templates/rag-prompt/latest")
            .with_status(200)
            .with_header("content-type", "application/yaml")
            .with_body(include_str!("../../../templates/rag-prompt.yaml"))
            .create_async()
            .await;

        let registry = HttpTemplateRegistry::new(server.url(), 5).unwrap();
        let template = registry.fetch("rag-prompt", "latest").await.unwrap();
        assert_eq!(template.name, "rag-prompt");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_not_found_is_fatal() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/templates/rag-prompt/9")
            .with_status(404)
            .create_async()
            .await;

        let registry = HttpTemplateRegistry::new(format!("{}/", server.url()), 5).unwrap();
        let err = registry.fetch("rag-prompt", "9").await.unwrap_err();
        assert!(matches!(err, DomainError::Configuration(_)));
        assert!(err.to_string().contains("404"));
    }
}
