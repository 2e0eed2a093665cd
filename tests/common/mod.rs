// Common test utilities and helpers
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;
use toolfinder::adapters::embeddings::HashedEmbeddingProvider;
use toolfinder::domain::models::{
    CatalogAction, CatalogRecord, MessageRole, PromptMessage, PromptTemplate, TemplateMessage,
};
use toolfinder::domain::ports::{
    ChatModel, EmbeddingInput, EmbeddingOutput, EmbeddingProvider, GenerationParameters,
};
use toolfinder::services::{AnswerGenerator, EmbeddingService, PromptComposer, RagPipeline};
use toolfinder::{DomainError, DomainResult};

pub const TEST_DIMENSION: usize = 256;

/// Create a temporary directory for tests
pub fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

/// Setup test logging (call once per test module)
pub fn setup_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// The single-record catalog used by the retrieval scenarios.
pub fn color_picker_record() -> CatalogRecord {
    CatalogRecord::new("ColorPicker", "pick colors", "ray")
        .with_url("https://example.com/color-picker")
        .with_action(CatalogAction::new("Pick Color", "choose a color from palette"))
}

pub fn music_record() -> CatalogRecord {
    let mut record = CatalogRecord::new("Spotify Player", "Control music playback", "jane")
        .with_url("https://example.com/spotify-player");
    record.actions = vec![
        CatalogAction::new("play", "Resume the current track"),
        CatalogAction::new("next", "Skip to the next track"),
    ];
    record
}

pub fn clipboard_record() -> CatalogRecord {
    let mut record = CatalogRecord::new("Clipboard History", "Browse and paste previous clipboard entries", "sam");
    record.actions = vec![CatalogAction::new("search-clipboard", "Search copied text")];
    record
}

/// Write `records` as a scraper-format catalog and return its path.
pub fn write_catalog(dir: &Path, records: &[CatalogRecord]) -> PathBuf {
    let path = dir.join("extensions.json");
    let json = serde_json::to_string_pretty(records).expect("Failed to serialize catalog");
    std::fs::write(&path, json).expect("Failed to write catalog");
    path
}

pub fn rag_template() -> PromptTemplate {
    PromptTemplate {
        name: "rag-prompt".into(),
        version: "latest".into(),
        messages: vec![TemplateMessage {
            role: MessageRole::User,
            content: "Question: {question}\nContext: {context}\nAnswer:".into(),
        }],
    }
}

/// Chat model that records every request and answers with a fixed string.
pub struct RecordingChatModel {
    answer: String,
    requests: Mutex<Vec<(PromptMessage, GenerationParameters)>>,
}

impl RecordingChatModel {
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<(PromptMessage, GenerationParameters)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatModel for RecordingChatModel {
    fn provider_id(&self) -> &'static str {
        "recording"
    }

    async fn complete(
        &self,
        prompt: &PromptMessage,
        parameters: &GenerationParameters,
    ) -> DomainResult<String> {
        self.requests
            .lock()
            .unwrap()
            .push((prompt.clone(), parameters.clone()));
        Ok(self.answer.clone())
    }
}

/// Embeds documents normally but fails every single-text query embedding
/// once `fail_queries` is set.
pub struct FlakyEmbeddingProvider {
    inner: HashedEmbeddingProvider,
    fail_queries: AtomicBool,
    query_calls: AtomicUsize,
}

impl FlakyEmbeddingProvider {
    pub fn new() -> Self {
        Self {
            inner: HashedEmbeddingProvider::new(TEST_DIMENSION),
            fail_queries: AtomicBool::new(false),
            query_calls: AtomicUsize::new(0),
        }
    }

    pub fn start_failing(&self) {
        self.fail_queries.store(true, Ordering::SeqCst);
    }

    pub fn query_calls(&self) -> usize {
        self.query_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for FlakyEmbeddingProvider {
    fn name(&self) -> &'static str {
        "flaky"
    }

    fn dimension(&self) -> usize {
        TEST_DIMENSION
    }

    async fn embed(&self, text: &str) -> DomainResult<Vec<f32>> {
        if self.fail_queries.load(Ordering::SeqCst) {
            self.query_calls.fetch_add(1, Ordering::SeqCst);
            return Err(DomainError::EmbeddingService("embedding backend unavailable".into()));
        }
        Ok(self.inner.embed_text(text))
    }

    async fn embed_batch(&self, inputs: &[EmbeddingInput]) -> DomainResult<Vec<EmbeddingOutput>> {
        self.inner.embed_batch(inputs).await
    }

    fn max_batch_size(&self) -> usize {
        self.inner.max_batch_size()
    }
}

pub fn generation_parameters() -> GenerationParameters {
    GenerationParameters {
        model: "gpt-4o-mini".into(),
        temperature: 0.0,
        max_tokens: 256,
    }
}

/// Build an offline pipeline over `records` with the given collaborators.
pub async fn offline_pipeline(
    records: &[CatalogRecord],
    provider: Arc<dyn EmbeddingProvider>,
    model: Arc<dyn ChatModel>,
    top_k: usize,
) -> RagPipeline {
    let service = Arc::new(EmbeddingService::with_defaults(provider));
    let index = toolfinder::infrastructure::bootstrap::build_index(records, service)
        .await
        .expect("Failed to build index");

    RagPipeline::new(
        Arc::new(index),
        PromptComposer::new(rag_template()).expect("Template should validate"),
        AnswerGenerator::new(model, generation_parameters()),
        top_k,
    )
}

/// Hashed-embedding pipeline with a recording model.
pub async fn hashed_pipeline(
    records: &[CatalogRecord],
    top_k: usize,
) -> (RagPipeline, Arc<RecordingChatModel>) {
    let model = Arc::new(RecordingChatModel::new("ColorPicker, pick-color"));
    let pipeline = offline_pipeline(
        records,
        Arc::new(HashedEmbeddingProvider::new(TEST_DIMENSION)),
        model.clone(),
        top_k,
    )
    .await;
    (pipeline, model)
}
