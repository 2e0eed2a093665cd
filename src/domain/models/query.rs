//! Per-query pipeline state.
//!
//! A query moves through `Start -> Retrieved -> Answered`. Each state is its
//! own type and every transition consumes the previous value, so a stage can
//! neither be skipped nor run twice. [`QueryState`] is the untyped snapshot
//! used at the edges (serialization, hand-built state); turning it back into a
//! typed state checks the single-assignment rules at runtime.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::document::Document;
use crate::domain::errors::{DomainError, DomainResult};

/// Which stage a query has reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryStage {
    Start,
    Retrieved,
    Answered,
}

impl fmt::Display for QueryStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryStage::Start => write!(f, "start"),
            QueryStage::Retrieved => write!(f, "retrieved"),
            QueryStage::Answered => write!(f, "answered"),
        }
    }
}

/// A question that has not been through retrieval yet.
#[derive(Debug, Clone)]
pub struct PendingQuery {
    id: Uuid,
    question: String,
}

impl PendingQuery {
    /// Start a new query. The question must contain non-whitespace text.
    pub fn new(question: impl Into<String>) -> DomainResult<Self> {
        let question = question.into();
        if question.trim().is_empty() {
            return Err(DomainError::InputValidation(
                "question must not be empty".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            question,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    /// Record the retrieved context. Only the retrieve stage calls this.
    pub(crate) fn with_context(self, context: Vec<Document>) -> RetrievedQuery {
        RetrievedQuery {
            id: self.id,
            question: self.question,
            context,
        }
    }
}

/// A question whose context has been retrieved.
#[derive(Debug, Clone)]
pub struct RetrievedQuery {
    id: Uuid,
    question: String,
    context: Vec<Document>,
}

impl RetrievedQuery {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    /// Retrieved documents in rank order. May be empty.
    pub fn context(&self) -> &[Document] {
        &self.context
    }

    /// Record the generated answer. Only the generate stage calls this.
    pub(crate) fn with_answer(self, answer: String) -> AnsweredQuery {
        AnsweredQuery {
            id: self.id,
            question: self.question,
            context: self.context,
            answer,
            answered_at: Utc::now(),
        }
    }
}

/// Terminal state: question, context and answer are all set.
#[derive(Debug, Clone)]
pub struct AnsweredQuery {
    id: Uuid,
    question: String,
    context: Vec<Document>,
    answer: String,
    answered_at: DateTime<Utc>,
}

impl AnsweredQuery {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn context(&self) -> &[Document] {
        &self.context
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    /// When the chat model's reply was recorded.
    pub fn answered_at(&self) -> DateTime<Utc> {
        self.answered_at
    }

    pub fn into_answer(self) -> String {
        self.answer
    }
}

/// Untyped snapshot of a query's working state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryState {
    pub id: Uuid,
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Vec<Document>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

impl QueryState {
    /// Fresh state holding only the question.
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            question: question.into(),
            context: None,
            answer: None,
        }
    }

    /// The furthest stage this snapshot has reached.
    pub fn stage(&self) -> QueryStage {
        match (&self.context, &self.answer) {
            (_, Some(_)) => QueryStage::Answered,
            (Some(_), None) => QueryStage::Retrieved,
            (None, None) => QueryStage::Start,
        }
    }
}

impl From<PendingQuery> for QueryState {
    fn from(query: PendingQuery) -> Self {
        Self {
            id: query.id,
            question: query.question,
            context: None,
            answer: None,
        }
    }
}

impl From<RetrievedQuery> for QueryState {
    fn from(query: RetrievedQuery) -> Self {
        Self {
            id: query.id,
            question: query.question,
            context: Some(query.context),
            answer: None,
        }
    }
}

impl From<AnsweredQuery> for QueryState {
    fn from(query: AnsweredQuery) -> Self {
        Self {
            id: query.id,
            question: query.question,
            context: Some(query.context),
            answer: Some(query.answer),
        }
    }
}

impl TryFrom<QueryState> for PendingQuery {
    type Error = DomainError;

    fn try_from(state: QueryState) -> DomainResult<Self> {
        if state.stage() != QueryStage::Start {
            return Err(DomainError::InvalidStateTransition {
                from: state.stage().to_string(),
                to: QueryStage::Retrieved.to_string(),
                reason: "retrieve already ran for this query".to_string(),
            });
        }
        let mut pending = PendingQuery::new(state.question)?;
        pending.id = state.id;
        Ok(pending)
    }
}

impl TryFrom<QueryState> for RetrievedQuery {
    type Error = DomainError;

    fn try_from(state: QueryState) -> DomainResult<Self> {
        match state.stage() {
            QueryStage::Retrieved => Ok(Self {
                id: state.id,
                question: state.question,
                context: state.context.unwrap_or_default(),
            }),
            QueryStage::Start => Err(DomainError::InvalidStateTransition {
                from: QueryStage::Start.to_string(),
                to: QueryStage::Answered.to_string(),
                reason: "context has not been retrieved".to_string(),
            }),
            QueryStage::Answered => Err(DomainError::InvalidStateTransition {
                from: QueryStage::Answered.to_string(),
                to: QueryStage::Answered.to_string(),
                reason: "answer is already set".to_string(),
            }),
        }
    }
}
