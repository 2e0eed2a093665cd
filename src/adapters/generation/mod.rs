//! Chat model adapters.
//!
//! Both adapters send one request per call and map every failure to
//! `DomainError::GenerationService`.

pub mod anthropic;
pub mod openai;

pub use anthropic::{AnthropicChatConfig, AnthropicChatModel};
pub use openai::{OpenAiChatConfig, OpenAiChatModel};

use reqwest::StatusCode;

use crate::domain::errors::DomainError;
use crate::infrastructure::logging::scrub;

/// Map a non-success HTTP response to a generation error.
fn status_error(provider: &str, status: StatusCode, body: &str) -> DomainError {
    let body = scrub(body);
    let message = match status {
        StatusCode::TOO_MANY_REQUESTS => format!("{provider} rate limited the request (429): {body}"),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            format!("{provider} rejected the credentials ({status}): {body}")
        }
        _ => format!("{provider} API returned {status}: {body}"),
    };
    DomainError::GenerationService(message)
}

/// Map a transport failure to a generation error.
fn transport_error(provider: &str, err: &reqwest::Error) -> DomainError {
    if err.is_timeout() {
        DomainError::GenerationService(format!("{provider} request timed out: {err}"))
    } else {
        DomainError::GenerationService(format!("{provider} request failed: {err}"))
    }
}

fn build_client(timeout_secs: u64) -> Result<reqwest::Client, DomainError> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| DomainError::Configuration(format!("Failed to create HTTP client: {e}")))
}
