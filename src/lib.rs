pub mod completion;
pub mod config;
pub mod debug_artifacts;
pub mod html_reduction;
pub mod server;
pub mod utils;

pub use completion::{CompletionError, CompletionService, build_service, build_style_prompt};
pub use config::{CompletionConfig, CompletionProvider, ConfigError, ServerConfig};
pub use debug_artifacts::ArtifactSaver;
pub use html_reduction::{
    Document, ReductionEngine, ReductionPatterns, ReductionResult, ReductionStats, parse_html,
    reduce_html, serialize_document,
};
pub use server::{ApiError, AppState, RestyleRequest, RestyleResponse, router, serve};
