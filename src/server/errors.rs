//! HTTP error mapping

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderValue, StatusCode, header::RETRY_AFTER};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::completion::CompletionError;

use super::types::ErrorBody;

/// Errors surfaced by the HTTP handlers
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or semantically invalid request body
    #[error("{0}")]
    InvalidRequest(String),

    /// `html_structure` or the whole body exceeds the configured cap
    #[error("Request too large: limit is {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("Error generating style: {0}")]
    Completion(#[from] CompletionError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Completion(err) => match err {
                CompletionError::NotConfigured { .. } => StatusCode::INTERNAL_SERVER_ERROR,
                CompletionError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
                CompletionError::ContentPolicy(_) => StatusCode::UNPROCESSABLE_ENTITY,
                _ => StatusCode::BAD_GATEWAY,
            },
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Map an axum body rejection, keeping the size-limit case distinct
    pub(crate) fn from_rejection(rejection: JsonRejection, limit: usize) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge { limit }
        } else {
            ApiError::InvalidRequest(rejection.body_text())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let retry_after = match &self {
            ApiError::Completion(CompletionError::RateLimited {
                retry_after: Some(delay),
            }) => HeaderValue::from_str(&delay.as_secs().to_string()).ok(),
            _ => None,
        };

        let mut response = (
            status,
            Json(ErrorBody {
                detail: self.to_string(),
            }),
        )
            .into_response();
        if let Some(value) = retry_after {
            response.headers_mut().insert(RETRY_AFTER, value);
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::InvalidRequest("x".into()), 422),
            (ApiError::PayloadTooLarge { limit: 1 }, 413),
            (
                ApiError::Completion(CompletionError::NotConfigured {
                    provider: "openrouter",
                    env_var: "OPENROUTER_API_KEY",
                }),
                500,
            ),
            (
                ApiError::Completion(CompletionError::RateLimited { retry_after: None }),
                429,
            ),
            (
                ApiError::Completion(CompletionError::ContentPolicy("no".into())),
                422,
            ),
            (
                ApiError::Completion(CompletionError::Timeout(Duration::from_secs(60))),
                502,
            ),
            (
                ApiError::Completion(CompletionError::Upstream {
                    status: 401,
                    body: "bad key".into(),
                }),
                502,
            ),
            (ApiError::Internal("boom".into()), 500),
        ];
        for (err, expected) in cases {
            assert_eq!(err.status().as_u16(), expected, "{err}");
        }
    }

    #[test]
    fn test_retry_after_header() {
        let response = ApiError::Completion(CompletionError::RateLimited {
            retry_after: Some(Duration::from_secs(30)),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[RETRY_AFTER], "30");
    }
}
