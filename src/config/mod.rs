//! Configuration module for the restyle server
//!
//! This module provides the `ServerConfig` struct, its fluent builder, and
//! environment loading with validation and sensible defaults.

// Sub-modules
pub mod builder;
pub mod env;
pub mod errors;
pub mod getters;
pub mod types;

// Re-exports for public API
pub use builder::ServerConfigBuilder;
pub use errors::ConfigError;
pub use types::{CompletionConfig, CompletionProvider, ServerConfig};
