//! HTTP plumbing shared by every provider

use std::time::Duration;

use reqwest::header::RETRY_AFTER;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::utils::safe_truncate_chars;

use super::errors::{CompletionError, CompletionResult};

/// Upstream error bodies are echoed to the caller; keep them bounded
const MAX_ERROR_BODY_CHARS: usize = 2000;

/// Build the shared client. The timeout is applied per request instead.
pub(crate) fn build_client() -> CompletionResult<Client> {
    Client::builder()
        .user_agent(concat!("restyle/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| CompletionError::Transport(e.to_string()))
}

/// Send `request` and decode a JSON body of type `T`.
///
/// Non-success statuses become `RateLimited` (429) or `Upstream`, unless
/// `classify` claims the status first (content-policy rejections).
pub(crate) async fn send_json<T, F>(
    request: RequestBuilder,
    timeout: Duration,
    classify: F,
) -> CompletionResult<T>
where
    T: DeserializeOwned,
    F: FnOnce(StatusCode, &str) -> Option<CompletionError>,
{
    let response = request.timeout(timeout).send().await.map_err(|e| {
        if e.is_timeout() {
            CompletionError::Timeout(timeout)
        } else {
            CompletionError::from(e)
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(status_error(response, classify).await);
    }

    let body = response.text().await.map_err(|e| {
        if e.is_timeout() {
            CompletionError::Timeout(timeout)
        } else {
            CompletionError::from(e)
        }
    })?;
    Ok(serde_json::from_str(&body)?)
}

async fn status_error<F>(response: Response, classify: F) -> CompletionError
where
    F: FnOnce(StatusCode, &str) -> Option<CompletionError>,
{
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs);
        return CompletionError::RateLimited { retry_after };
    }

    let body = response.text().await.unwrap_or_default();
    if let Some(err) = classify(status, &body) {
        return err;
    }

    log::error!("Provider API error: {} {}", status.as_u16(), body);
    CompletionError::Upstream {
        status: status.as_u16(),
        body: safe_truncate_chars(&body, MAX_ERROR_BODY_CHARS).to_string(),
    }
}

/// Default classifier: every non-success status is a plain upstream error
pub(crate) fn no_policy(_status: StatusCode, _body: &str) -> Option<CompletionError> {
    None
}

/// Reject empty or whitespace-only completions
pub(crate) fn non_empty(text: String) -> CompletionResult<String> {
    if text.trim().is_empty() {
        Err(CompletionError::EmptyResponse)
    } else {
        Ok(text)
    }
}
