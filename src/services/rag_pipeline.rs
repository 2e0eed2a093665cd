//! Two-stage retrieve-then-generate pipeline.
//!
//! The pipeline holds only shared collaborators. All per-query data lives in
//! the typed query values, so one pipeline can serve concurrent questions.

use std::sync::Arc;

use tracing::Instrument;

use super::answer_generator::AnswerGenerator;
use super::prompt_composer::PromptComposer;
use crate::domain::errors::{DomainError, PipelineError, PipelineResult};
use crate::domain::models::{AnsweredQuery, PendingQuery, QueryState, RetrievedQuery};
use crate::domain::ports::VectorIndex;

/// Turn a bare task ("pick a color") into the catalog question.
pub fn frame_question(task: &str) -> String {
    format!(
        "Which extension and command would I use to {}. Output extensionTitle, extensionCommand",
        task.trim()
    )
}

/// Orchestrates `retrieve -> generate` over a finished index.
pub struct RagPipeline {
    index: Arc<dyn VectorIndex>,
    composer: PromptComposer,
    generator: AnswerGenerator,
    top_k: usize,
}

impl RagPipeline {
    pub fn new(
        index: Arc<dyn VectorIndex>,
        composer: PromptComposer,
        generator: AnswerGenerator,
        top_k: usize,
    ) -> Self {
        Self {
            index,
            composer,
            generator,
            top_k,
        }
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Override the number of documents retrieved per query.
    #[must_use]
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn index(&self) -> &Arc<dyn VectorIndex> {
        &self.index
    }

    /// Retrieve stage: look up the top-k documents for the question.
    pub async fn retrieve(&self, query: PendingQuery) -> PipelineResult<RetrievedQuery> {
        let context = self
            .index
            .similarity_search(query.question(), self.top_k)
            .await
            .map_err(PipelineError::retrieve)?;

        tracing::info!(
            stage = "retrieve",
            top_k = self.top_k,
            documents = context.len(),
            "context retrieved"
        );
        Ok(query.with_context(context))
    }

    /// Generate stage: compose the prompt and ask the chat model.
    pub async fn generate(&self, query: RetrievedQuery) -> PipelineResult<AnsweredQuery> {
        let prompt = self
            .composer
            .compose(query.question(), query.context())
            .map_err(PipelineError::generate)?;

        let answer = self
            .generator
            .generate(&prompt)
            .await
            .map_err(PipelineError::generate)?;

        tracing::info!(stage = "generate", "answer ready");
        Ok(query.with_answer(answer))
    }

    /// Generate from an untyped snapshot. Fails before any model call if
    /// the snapshot has no context or already has an answer.
    pub async fn generate_from_state(&self, state: QueryState) -> PipelineResult<AnsweredQuery> {
        let query = RetrievedQuery::try_from(state).map_err(PipelineError::generate)?;
        self.generate(query).await
    }

    /// Run both stages for one question.
    pub async fn run(&self, question: impl Into<String>) -> PipelineResult<AnsweredQuery> {
        let query = PendingQuery::new(question).map_err(PipelineError::retrieve)?;
        let span = tracing::info_span!("query", query_id = %query.id());

        async move {
            let retrieved = self.retrieve(query).await?;
            self.generate(retrieved).await
        }
        .instrument(span)
        .await
    }

    /// Run both stages and return only the answer text.
    pub async fn ask(&self, question: impl Into<String>) -> PipelineResult<String> {
        self.run(question).await.map(AnsweredQuery::into_answer)
    }
}

impl std::fmt::Debug for RagPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RagPipeline")
            .field("documents", &self.index.len())
            .field("template", &self.composer.template().id())
            .field("model", &self.generator.parameters().model)
            .field("top_k", &self.top_k)
            .finish()
    }
}

/// True when `err` came from a transition attempted out of order.
pub fn is_state_error(err: &PipelineError) -> bool {
    matches!(err.inner(), DomainError::InvalidStateTransition { .. })
}
