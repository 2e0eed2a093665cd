//! Prompt templates and the rendered messages sent to the chat model.

use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainError, DomainResult};

/// Slot bound to the user's question.
pub const QUESTION_SLOT: &str = "question";

/// Slot bound to the newline-joined retrieved context.
pub const CONTEXT_SLOT: &str = "context";

/// Role of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl MessageRole {
    pub const fn as_str(self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

/// One message of a template, with `{slot}` placeholders in its content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateMessage {
    pub role: MessageRole,
    pub content: String,
}

/// A named, versioned prompt template.
///
/// Fetched once at startup and treated as immutable for the rest of the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTemplate {
    pub name: String,
    pub version: String,
    pub messages: Vec<TemplateMessage>,
}

impl PromptTemplate {
    /// Ensure every required slot appears in at least one message.
    pub fn validate(&self) -> DomainResult<()> {
        if self.messages.is_empty() {
            return Err(DomainError::TemplateBinding(format!(
                "template '{}@{}' has no messages",
                self.name, self.version
            )));
        }

        for slot in [QUESTION_SLOT, CONTEXT_SLOT] {
            let placeholder = placeholder(slot);
            if !self.messages.iter().any(|m| m.content.contains(&placeholder)) {
                return Err(DomainError::TemplateBinding(format!(
                    "template '{}@{}' is missing the {} slot",
                    self.name, self.version, placeholder
                )));
            }
        }

        Ok(())
    }

    /// Identifier used in logs, e.g. `rag-prompt@latest`.
    pub fn id(&self) -> String {
        format!("{}@{}", self.name, self.version)
    }
}

pub(crate) fn placeholder(slot: &str) -> String {
    format!("{{{slot}}}")
}

/// A rendered chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

/// The fully bound prompt handed to the answer generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    /// Template the prompt was rendered from, as `name@version`.
    pub template: String,
    pub messages: Vec<ChatMessage>,
}

impl PromptMessage {
    /// Concatenated system messages, if any.
    pub fn system_text(&self) -> Option<String> {
        let parts: Vec<&str> = self
            .messages
            .iter()
            .filter(|m| m.role == MessageRole::System)
            .map(|m| m.content.as_str())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("\n\n"))
        }
    }

    /// Messages other than system messages, in order.
    pub fn conversation(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter().filter(|m| m.role != MessageRole::System)
    }

    /// All message contents joined, for logging and assertions.
    pub fn text(&self) -> String {
        self.messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
