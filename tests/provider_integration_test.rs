//! End-to-end tests for pipelines wired from configuration
//!
//! The OpenAI-compatible embedding and chat endpoints are served by a mock
//! HTTP server, so these run without network access or API keys.
//!
//! Test coverage:
//! - Startup from config: template file, embedding provider, chat model
//! - Request bodies sent to the chat endpoint
//! - Generation failures surface tagged with the generate stage
//! - Embedding failures during index build are tagged build

mod common;

use common::{color_picker_record, temp_dir};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;
use toolfinder::domain::models::{Config, EmbeddingProviderKind, GenerationProviderKind};
use toolfinder::infrastructure::bootstrap::build_pipeline;
use toolfinder::infrastructure::setup::{initialize, SetupPaths};
use toolfinder::{DomainError, PipelineError, PipelineStage};

const API_KEY: &str = "sk-test-integration-0123456789";

fn mock_config(server: &ServerGuard, templates_dir: &std::path::Path) -> Config {
    let mut config = Config::default();
    config.embedding.provider = EmbeddingProviderKind::OpenAi;
    config.embedding.base_url = server.url();
    config.embedding.api_key = Some(API_KEY.to_string());
    config.embedding.dimension = 3;
    config.generation.provider = GenerationProviderKind::OpenAi;
    config.generation.base_url = Some(server.url());
    config.generation.api_key = Some(API_KEY.to_string());
    config.template.directory = templates_dir.display().to_string();
    config
}

fn embeddings_body() -> String {
    json!({
        "data": [{"embedding": [0.6, 0.8, 0.0], "index": 0}]
    })
    .to_string()
}

#[tokio::test]
async fn test_pipeline_from_config_answers_with_mock_providers() {
    let dir = temp_dir();
    let paths = SetupPaths::in_dir(dir.path());
    initialize(&paths, false).unwrap();

    let mut server = Server::new_async().await;
    let embeddings = server
        .mock("POST", "/embeddings")
        .match_header("authorization", format!("Bearer {API_KEY}").as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(embeddings_body())
        .expect(2)
        .create_async()
        .await;
    let chat = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(json!({
                "model": "gpt-4o-mini",
                "temperature": 0.0
            })),
            Matcher::Regex("pick a color".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "choices": [{"message": {"role": "assistant", "content": "ColorPicker, pick-color"}}]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let config = mock_config(&server, &paths.templates_dir);
    let pipeline = build_pipeline(&config, &[color_picker_record()]).await.unwrap();
    let answer = pipeline.ask("pick a color").await.unwrap();

    assert_eq!(answer, "ColorPicker, pick-color");
    embeddings.assert_async().await;
    chat.assert_async().await;
}

#[tokio::test]
async fn test_rate_limited_generation_is_tagged_generate() {
    let dir = temp_dir();
    let paths = SetupPaths::in_dir(dir.path());
    initialize(&paths, false).unwrap();

    let mut server = Server::new_async().await;
    let _embeddings = server
        .mock("POST", "/embeddings")
        .with_status(200)
        .with_body(embeddings_body())
        .create_async()
        .await;
    let _chat = server
        .mock("POST", "/chat/completions")
        .with_status(429)
        .with_body(r#"{"error":{"message":"Rate limit reached"}}"#)
        .create_async()
        .await;

    let config = mock_config(&server, &paths.templates_dir);
    let pipeline = build_pipeline(&config, &[color_picker_record()]).await.unwrap();
    let err = pipeline.run("pick a color").await.unwrap_err();

    assert_eq!(err.stage(), PipelineStage::Generate);
    assert!(matches!(err.inner(), DomainError::GenerationService(_)));
    assert!(err.to_string().contains("rate limited"));
}

#[tokio::test]
async fn test_embedding_outage_at_startup_is_tagged_build() {
    let dir = temp_dir();
    let paths = SetupPaths::in_dir(dir.path());
    initialize(&paths, false).unwrap();

    let mut server = Server::new_async().await;
    let _embeddings = server
        .mock("POST", "/embeddings")
        .with_status(503)
        .with_body("service unavailable")
        .create_async()
        .await;

    let config = mock_config(&server, &paths.templates_dir);
    let err = build_pipeline(&config, &[color_picker_record()])
        .await
        .unwrap_err();

    let pipeline_err = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<PipelineError>())
        .expect("error chain should carry the pipeline stage");
    assert_eq!(pipeline_err.stage(), PipelineStage::Build);
    assert!(matches!(
        pipeline_err.inner(),
        DomainError::EmbeddingService(_)
    ));
}
