//! Error types for completion requests

use std::time::Duration;
use thiserror::Error;

/// Result type alias for completion operations
pub type CompletionResult<T> = Result<T, CompletionError>;

/// Error types for completion requests
#[derive(Debug, Error)]
pub enum CompletionError {
    /// No usable API key for the selected provider
    #[error("{provider} API key not configured. Set {env_var} in .env.")]
    NotConfigured {
        provider: &'static str,
        env_var: &'static str,
    },

    /// Connection, DNS or TLS failure before a response arrived
    #[error("Transport error: {0}")]
    Transport(String),

    /// Provider did not answer within the configured timeout
    #[error("Completion request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// Provider returned 429
    #[error("Rate limited by provider{}", retry_after.map(|d| format!(" (retry after {}s)", d.as_secs())).unwrap_or_default())]
    RateLimited { retry_after: Option<Duration> },

    /// Non-success status from the provider
    #[error("Provider API error: {status} {body}")]
    Upstream { status: u16, body: String },

    /// Provider refused the prompt or filtered the output
    #[error("Request rejected by provider content policy: {0}")]
    ContentPolicy(String),

    /// Response parsed but carried no text
    #[error("Provider returned an empty completion")]
    EmptyResponse,

    /// Response body did not have the expected shape
    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for CompletionError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            CompletionError::MalformedResponse(error.to_string())
        } else {
            CompletionError::Transport(error.to_string())
        }
    }
}

impl From<serde_json::Error> for CompletionError {
    fn from(error: serde_json::Error) -> Self {
        CompletionError::MalformedResponse(error.to_string())
    }
}

impl CompletionError {
    /// Check if error is transient and a later attempt may succeed
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            CompletionError::Transport(_)
            | CompletionError::Timeout(_)
            | CompletionError::RateLimited { .. } => true,
            CompletionError::Upstream { status, .. } => {
                *status >= 500 || *status == 408 || *status == 529
            }
            _ => false,
        }
    }
}
