//! Redaction of credentials in provider responses before they reach logs or
//! error messages.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static SCRUBBER: LazyLock<SecretScrubber> = LazyLock::new(SecretScrubber::new);

/// Scrub `message` with the shared scrubber.
pub fn scrub(message: &str) -> String {
    SCRUBBER.scrub_message(message)
}

/// Regex-based secret redactor.
#[derive(Clone)]
pub struct SecretScrubber {
    api_key_pattern: Regex,
    bearer_pattern: Regex,
    field_pattern: Regex,
}

impl SecretScrubber {
    /// Compile the redaction patterns.
    pub fn new() -> Self {
        Self {
            // OpenAI (sk-..., sk-proj-...) and Anthropic (sk-ant-...) keys
            api_key_pattern: Regex::new(r"\bsk-[a-zA-Z0-9_-]{16,}")
                .expect("api key pattern is a valid regex"),
            bearer_pattern: Regex::new(r"Bearer\s+[a-zA-Z0-9_.\-]+")
                .expect("bearer pattern is a valid regex"),
            field_pattern: Regex::new(
                r#"(["']?(?:api_key|apikey|x-api-key|token|secret|password)["']?\s*[:=]\s*)["']?[^"'\s,}]+["']?"#,
            )
            .expect("field pattern is a valid regex"),
        }
    }

    /// Return `message` with keys, bearer tokens and secret-looking fields redacted.
    pub fn scrub_message(&self, message: &str) -> String {
        let scrubbed = self
            .api_key_pattern
            .replace_all(message, "[API_KEY_REDACTED]");
        let scrubbed = self
            .bearer_pattern
            .replace_all(&scrubbed, "Bearer [TOKEN_REDACTED]");
        self.field_pattern
            .replace_all(&scrubbed, |caps: &Captures| format!("{}[REDACTED]", &caps[1]))
            .into_owned()
    }
}

impl Default for SecretScrubber {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SecretScrubber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretScrubber").finish()
    }
}
