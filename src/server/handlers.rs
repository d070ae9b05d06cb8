//! Route handlers

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;

use crate::debug_artifacts::{artifact_stem_now, spawn_save_css, spawn_save_html};
use crate::html_reduction::ReductionEngine;
use crate::utils::{CSS_PREVIEW_CHARS, safe_truncate_chars};

use super::AppState;
use super::errors::ApiError;
use super::types::{RestyleRequest, RestyleResponse};

/// `GET /health`
pub async fn health() -> &'static str {
    "ok"
}

/// `POST /restyle`: reduce the submitted HTML, ask the model for CSS, return it
pub async fn restyle(
    State(state): State<AppState>,
    payload: Result<Json<RestyleRequest>, JsonRejection>,
) -> Result<Json<RestyleResponse>, ApiError> {
    let max_html_bytes = state.config.max_html_bytes();
    let Json(request) = payload.map_err(|e| ApiError::from_rejection(e, max_html_bytes))?;

    let prompt = request.prompt.trim().to_string();
    if prompt.is_empty() {
        return Err(ApiError::InvalidRequest("prompt must not be empty".into()));
    }
    if request.html_structure.len() > max_html_bytes {
        return Err(ApiError::PayloadTooLarge {
            limit: max_html_bytes,
        });
    }

    log::info!("Received prompt: {prompt}");

    let patterns = Arc::clone(&state.patterns);
    let original_html = request.html_structure;
    let (original_html, reduction) = tokio::task::spawn_blocking(move || {
        let result = ReductionEngine::new(&patterns).reduce(&original_html);
        (original_html, result)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("HTML reduction task failed: {e}")))?;

    log::info!(
        "HTML cleaning reduced tokens by approximately {} tokens ({:.1}%)",
        reduction.estimated_tokens_saved(),
        reduction.reduction_percent()
    );
    log::debug!(
        "Reduction stats: {} -> {} bytes, {:?}",
        reduction.original_bytes,
        reduction.reduced_bytes,
        reduction.stats
    );

    let config = &state.config;
    let stem = (config.html_logging_enabled() || config.css_logging_enabled())
        .then(|| artifact_stem_now(&prompt));

    if let (true, Some(stem)) = (config.html_logging_enabled(), &stem) {
        spawn_save_html(
            Arc::clone(&state.artifacts),
            stem.clone(),
            original_html,
            reduction.reduced_html.clone(),
        );
    }

    let generated_style = state
        .completion
        .generate(&prompt, &reduction.reduced_html)
        .await
        .map_err(|e| {
            log::error!(
                "Error during {} completion call: {e}",
                state.completion.provider()
            );
            ApiError::from(e)
        })?;

    log::info!("Generated CSS length: {} characters", generated_style.chars().count());
    log::debug!(
        "CSS Preview:\n{}...",
        safe_truncate_chars(&generated_style, CSS_PREVIEW_CHARS)
    );

    if let (true, Some(stem)) = (config.css_logging_enabled(), stem) {
        spawn_save_css(Arc::clone(&state.artifacts), stem, generated_style.clone());
    }

    Ok(Json(RestyleResponse { generated_style }))
}
