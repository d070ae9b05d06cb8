//! Getter methods for `ServerConfig` and `CompletionConfig`
//!
//! Completion getters resolve overrides against the provider defaults, so
//! callers never see an unset model or base URL.

use std::path::{Path, PathBuf};
use std::time::Duration;

use super::types::{CompletionConfig, CompletionProvider, ServerConfig};

impl ServerConfig {
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    #[must_use]
    pub fn html_logging_enabled(&self) -> bool {
        self.enable_html_logging
    }

    #[must_use]
    pub fn css_logging_enabled(&self) -> bool {
        self.enable_css_logging
    }

    #[must_use]
    pub fn html_log_dir(&self) -> &Path {
        &self.html_log_dir
    }

    #[must_use]
    pub fn css_log_dir(&self) -> &Path {
        &self.css_log_dir
    }

    #[must_use]
    pub fn max_html_bytes(&self) -> usize {
        self.max_html_bytes
    }

    #[must_use]
    pub fn cors_allowed_origins(&self) -> &[String] {
        &self.cors_allowed_origins
    }

    #[must_use]
    pub fn patterns_path(&self) -> Option<&PathBuf> {
        self.patterns_path.as_ref()
    }

    #[must_use]
    pub fn completion(&self) -> &CompletionConfig {
        &self.completion
    }

    #[must_use]
    pub fn provider(&self) -> CompletionProvider {
        self.completion.provider()
    }

    #[must_use]
    pub fn model(&self) -> &str {
        self.completion.model()
    }

    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.completion.api_key()
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        self.completion.base_url()
    }
}

impl CompletionConfig {
    #[must_use]
    pub fn provider(&self) -> CompletionProvider {
        self.provider
    }

    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Configured model, falling back to the provider default
    #[must_use]
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }

    #[must_use]
    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
            .unwrap_or_else(|| self.provider.default_max_tokens())
    }

    /// API base URL without a trailing slash
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.provider.default_base_url())
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
