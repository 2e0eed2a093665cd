//! Binds a question and retrieved context into the startup template.

use std::sync::Arc;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::prompt::placeholder;
use crate::domain::models::{
    ChatMessage, Document, PromptMessage, PromptTemplate, CONTEXT_SLOT, QUESTION_SLOT,
};

/// Composes [`PromptMessage`]s from a fixed template.
#[derive(Debug, Clone)]
pub struct PromptComposer {
    template: Arc<PromptTemplate>,
}

impl PromptComposer {
    /// Wrap a template, validating its slots up front.
    pub fn new(template: PromptTemplate) -> DomainResult<Self> {
        template.validate()?;
        Ok(Self {
            template: Arc::new(template),
        })
    }

    pub fn template(&self) -> &PromptTemplate {
        &self.template
    }

    /// Bind `question` and the newline-joined `context` contents.
    ///
    /// Context order is preserved as received. An empty context binds as an
    /// empty string.
    pub fn compose(&self, question: &str, context: &[Document]) -> DomainResult<PromptMessage> {
        let joined = join_context(context);
        let question_placeholder = placeholder(QUESTION_SLOT);
        let context_placeholder = placeholder(CONTEXT_SLOT);

        let mut bound = [false, false];
        let messages = self
            .template
            .messages
            .iter()
            .map(|message| {
                bound[0] |= message.content.contains(&question_placeholder);
                bound[1] |= message.content.contains(&context_placeholder);
                ChatMessage {
                    role: message.role,
                    content: bind(&message.content, &question_placeholder, question, &context_placeholder, &joined),
                }
            })
            .collect();

        for (slot, present) in [QUESTION_SLOT, CONTEXT_SLOT].into_iter().zip(bound) {
            if !present {
                return Err(DomainError::TemplateBinding(format!(
                    "template '{}' has no {{{slot}}} slot",
                    self.template.id()
                )));
            }
        }

        Ok(PromptMessage {
            template: self.template.id(),
            messages,
        })
    }
}

/// Join document contents with a single newline.
pub fn join_context(context: &[Document]) -> String {
    context
        .iter()
        .map(|doc| doc.content.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

// Single pass so a question containing "{context}" is not substituted twice.
fn bind(content: &str, q_slot: &str, question: &str, c_slot: &str, context: &str) -> String {
    let mut out = String::with_capacity(content.len() + question.len() + context.len());
    let mut rest = content;
    loop {
        let next_q = rest.find(q_slot);
        let next_c = rest.find(c_slot);
        let (at, slot, value) = match (next_q, next_c) {
            (Some(q), Some(c)) if c < q => (c, c_slot, context),
            (Some(q), _) => (q, q_slot, question),
            (None, Some(c)) => (c, c_slot, context),
            (None, None) => break,
        };
        out.push_str(&rest[..at]);
        out.push_str(value);
        rest = &rest[at + slot.len()..];
    }
    out.push_str(rest);
    out
}
