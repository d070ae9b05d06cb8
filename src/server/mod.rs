//! HTTP surface: `POST /restyle` and `GET /health`
//!
//! The router is built from an [`AppState`] so tests can drive it with a fake
//! completion service and `tower::ServiceExt::oneshot`.

pub mod errors;
pub mod handlers;
pub mod types;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, header};
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};

use crate::completion::{self, CompletionService};
use crate::config::ServerConfig;
use crate::debug_artifacts::ArtifactSaver;
use crate::html_reduction::ReductionPatterns;
use crate::utils::REQUEST_ENVELOPE_SLACK_BYTES;

pub use errors::ApiError;
pub use types::{ErrorBody, RestyleRequest, RestyleResponse};

/// Shared, read-only per-process state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub patterns: Arc<ReductionPatterns>,
    pub completion: Arc<dyn CompletionService>,
    pub artifacts: Arc<ArtifactSaver>,
}

impl AppState {
    pub fn new(
        config: ServerConfig,
        patterns: ReductionPatterns,
        completion: Arc<dyn CompletionService>,
    ) -> Self {
        let artifacts = Arc::new(ArtifactSaver::from_config(&config));
        Self {
            config: Arc::new(config),
            patterns: Arc::new(patterns),
            completion,
            artifacts,
        }
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    let body_limit = state
        .config
        .max_html_bytes()
        .saturating_add(REQUEST_ENVELOPE_SLACK_BYTES);
    let cors = cors_layer(state.config.cors_allowed_origins());

    Router::new()
        .route("/health", get(handlers::health))
        .route("/restyle", post(handlers::restyle))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    if origins.is_empty() {
        return base.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Ignoring invalid CORS origin {origin:?}: {e}");
                None
            }
        })
        .collect();
    base.allow_origin(allowed)
}

/// Load patterns, build the completion service, bind and serve until Ctrl-C
pub async fn serve(config: ServerConfig) -> Result<()> {
    let patterns = match config.patterns_path() {
        Some(path) => ReductionPatterns::from_path(path)
            .await
            .context("Failed to load reduction patterns")?,
        None => ReductionPatterns::builtin().clone(),
    };
    let completion =
        completion::build_service(&config).context("Failed to build completion service")?;

    let host = config.host().to_string();
    let port = config.port();
    let state = AppState::new(config, patterns, completion);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("Failed to bind {host}:{port}"))?;
    log::info!("Starting server on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown signal received");
}
