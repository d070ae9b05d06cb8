//! Fluent builder for `ServerConfig`
//!
//! Every field has a default, so the builder has no required steps; `build()`
//! validates the combination and normalizes placeholder API keys away.

use std::path::PathBuf;

use crate::utils::API_KEY_PLACEHOLDER;

use super::errors::ConfigError;
use super::types::{CompletionProvider, ServerConfig};

#[derive(Debug, Clone, Default)]
pub struct ServerConfigBuilder {
    config: ServerConfig,
}

impl ServerConfig {
    /// Create a builder for configuring a `ServerConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }
}

impl ServerConfigBuilder {
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    #[must_use]
    pub fn html_logging(mut self, enabled: bool) -> Self {
        self.config.enable_html_logging = enabled;
        self
    }

    #[must_use]
    pub fn css_logging(mut self, enabled: bool) -> Self {
        self.config.enable_css_logging = enabled;
        self
    }

    #[must_use]
    pub fn html_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.html_log_dir = dir.into();
        self
    }

    #[must_use]
    pub fn css_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.css_log_dir = dir.into();
        self
    }

    #[must_use]
    pub fn max_html_bytes(mut self, bytes: usize) -> Self {
        self.config.max_html_bytes = bytes;
        self
    }

    /// Restrict CORS to these origins; an empty list (or `*`) allows any origin
    #[must_use]
    pub fn cors_allowed_origins<I, S>(mut self, origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.cors_allowed_origins = origins.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn patterns_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.patterns_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn provider(mut self, provider: CompletionProvider) -> Self {
        self.config.completion.provider = provider;
        self
    }

    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.completion.api_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.completion.model = Some(model.into());
        self
    }

    #[must_use]
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.config.completion.max_tokens = Some(max_tokens);
        self
    }

    #[must_use]
    pub fn completion_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.completion.base_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn completion_timeout_secs(mut self, secs: u64) -> Self {
        self.config.completion.timeout_secs = secs;
        self
    }

    /// Validate and produce the final configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for a blank host, a zero size
    /// limit, a zero timeout, or a zero token cap.
    pub fn build(mut self) -> Result<ServerConfig, ConfigError> {
        let config = &mut self.config;

        config.host = config.host.trim().to_string();
        if config.host.is_empty() {
            return Err(ConfigError::invalid("SERVER_HOST", "", "host must not be empty"));
        }
        if config.max_html_bytes == 0 {
            return Err(ConfigError::invalid("MAX_HTML_BYTES", "0", "must be greater than zero"));
        }
        if config.completion.timeout_secs == 0 {
            return Err(ConfigError::invalid(
                "COMPLETION_TIMEOUT_SECS",
                "0",
                "must be greater than zero",
            ));
        }
        if config.completion.max_tokens == Some(0) {
            return Err(ConfigError::invalid(
                "COMPLETION_MAX_TOKENS",
                "0",
                "must be greater than zero",
            ));
        }

        config.completion.api_key = config
            .completion
            .api_key
            .take()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty() && key != API_KEY_PLACEHOLDER);

        for field in [&mut config.completion.model, &mut config.completion.base_url] {
            if field.as_deref().is_some_and(|value| value.trim().is_empty()) {
                *field = None;
            }
        }
        if let Some(url) = config.completion.base_url.as_mut() {
            *url = url.trim().trim_end_matches('/').to_string();
        }

        config.cors_allowed_origins = config
            .cors_allowed_origins
            .iter()
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty() && origin != "*")
            .collect();

        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::builder().build().unwrap();
        assert_eq!(config.host(), "0.0.0.0");
        assert_eq!(config.port(), 8000);
        assert!(!config.html_logging_enabled());
        assert!(!config.css_logging_enabled());
        assert_eq!(config.provider(), CompletionProvider::OpenRouter);
        assert_eq!(config.model(), "openai/gpt-4.1-mini");
        assert!(config.api_key().is_none());
    }

    #[test]
    fn test_placeholder_key_is_treated_as_missing() {
        let config = ServerConfig::builder()
            .api_key(" YOUR_API_KEY_HERE ")
            .build()
            .unwrap();
        assert!(config.api_key().is_none());
    }

    #[test]
    fn test_rejects_zero_limits() {
        assert!(ServerConfig::builder().max_html_bytes(0).build().is_err());
        assert!(ServerConfig::builder().completion_timeout_secs(0).build().is_err());
        assert!(ServerConfig::builder().max_tokens(0).build().is_err());
        assert!(ServerConfig::builder().host("  ").build().is_err());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed_and_wildcard_origin_dropped() {
        let config = ServerConfig::builder()
            .completion_base_url("http://127.0.0.1:9999/")
            .cors_allowed_origins(["*", " https://news.ycombinator.com "])
            .build()
            .unwrap();
        assert_eq!(config.base_url(), "http://127.0.0.1:9999");
        assert_eq!(config.cors_allowed_origins(), ["https://news.ycombinator.com"]);
    }
}
