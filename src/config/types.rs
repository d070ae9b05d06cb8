//! Core configuration types for the restyle server
//!
//! This module contains the main `ServerConfig` struct and the completion
//! provider settings it carries.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::utils::{
    DEFAULT_COMPLETION_TIMEOUT_SECS, DEFAULT_CSS_LOG_DIR, DEFAULT_HTML_LOG_DIR,
    DEFAULT_MAX_HTML_BYTES, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
};

use super::errors::ConfigError;

/// Hosted language-model API used to generate CSS
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionProvider {
    /// OpenAI-compatible chat completions via OpenRouter
    #[default]
    OpenRouter,
    /// Anthropic Messages API
    Anthropic,
    /// Google Gemini `generateContent`
    Gemini,
}

impl CompletionProvider {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CompletionProvider::OpenRouter => "openrouter",
            CompletionProvider::Anthropic => "anthropic",
            CompletionProvider::Gemini => "gemini",
        }
    }

    /// Environment variable holding this provider's API key
    #[must_use]
    pub fn api_key_env(self) -> &'static str {
        match self {
            CompletionProvider::OpenRouter => "OPENROUTER_API_KEY",
            CompletionProvider::Anthropic => "ANTHROPIC_API_KEY",
            CompletionProvider::Gemini => "GOOGLE_API_KEY",
        }
    }

    #[must_use]
    pub fn default_model(self) -> &'static str {
        match self {
            CompletionProvider::OpenRouter => "openai/gpt-4.1-mini",
            CompletionProvider::Anthropic => "claude-3-7-sonnet-20250219",
            CompletionProvider::Gemini => "gemini-2.5-pro-preview-03-25",
        }
    }

    /// Output token cap; full-page stylesheets need room
    #[must_use]
    pub fn default_max_tokens(self) -> u32 {
        match self {
            CompletionProvider::OpenRouter | CompletionProvider::Gemini => 8192,
            CompletionProvider::Anthropic => 4096,
        }
    }

    #[must_use]
    pub fn default_base_url(self) -> &'static str {
        match self {
            CompletionProvider::OpenRouter => "https://openrouter.ai/api/v1",
            CompletionProvider::Anthropic => "https://api.anthropic.com",
            CompletionProvider::Gemini => "https://generativelanguage.googleapis.com",
        }
    }
}

impl fmt::Display for CompletionProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompletionProvider {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "openrouter" | "open-router" | "openai" => Ok(CompletionProvider::OpenRouter),
            "anthropic" | "claude" => Ok(CompletionProvider::Anthropic),
            "gemini" | "google" => Ok(CompletionProvider::Gemini),
            _ => Err(ConfigError::InvalidValue {
                key: "COMPLETION_PROVIDER".to_string(),
                value: value.to_string(),
                reason: "expected one of: openrouter, anthropic, gemini".to_string(),
            }),
        }
    }
}

/// Settings for the completion adapter
#[derive(Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    pub(crate) provider: CompletionProvider,
    /// `None` when unset or still the `.env` placeholder
    #[serde(skip_serializing)]
    pub(crate) api_key: Option<String>,
    /// Overrides the provider's default model
    pub(crate) model: Option<String>,
    pub(crate) max_tokens: Option<u32>,
    /// Overrides the provider's API base URL (proxies, tests)
    pub(crate) base_url: Option<String>,
    pub(crate) timeout_secs: u64,
}

// Manual impl so the API key never reaches a log line
impl fmt::Debug for CompletionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionConfig")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            provider: CompletionProvider::default(),
            api_key: None,
            model: None,
            max_tokens: None,
            base_url: None,
            timeout_secs: DEFAULT_COMPLETION_TIMEOUT_SECS,
        }
    }
}

/// Main configuration struct for the restyle server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub(crate) host: String,
    pub(crate) port: u16,

    /// Save original and reduced request HTML under `html_log_dir`
    pub(crate) enable_html_logging: bool,
    /// Save generated CSS under `css_log_dir`
    pub(crate) enable_css_logging: bool,
    pub(crate) html_log_dir: PathBuf,
    pub(crate) css_log_dir: PathBuf,

    /// Largest `html_structure` accepted, in bytes
    pub(crate) max_html_bytes: usize,

    /// Allowed CORS origins. Empty means any origin.
    pub(crate) cors_allowed_origins: Vec<String>,

    /// Optional JSON file replacing the built-in reduction patterns
    pub(crate) patterns_path: Option<PathBuf>,

    pub(crate) completion: CompletionConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SERVER_HOST.to_string(),
            port: DEFAULT_SERVER_PORT,
            enable_html_logging: false,
            enable_css_logging: false,
            html_log_dir: PathBuf::from(DEFAULT_HTML_LOG_DIR),
            css_log_dir: PathBuf::from(DEFAULT_CSS_LOG_DIR),
            max_html_bytes: DEFAULT_MAX_HTML_BYTES,
            cors_allowed_origins: Vec::new(),
            patterns_path: None,
            completion: CompletionConfig::default(),
        }
    }
}
