//! Environment loading for `ServerConfig`
//!
//! Values come from a lookup closure so tests can supply a map instead of
//! mutating the process environment. `from_env` plugs in `std::env::var`.

use std::str::FromStr;

use super::errors::ConfigError;
use super::types::{CompletionProvider, ServerConfig};

impl ServerConfig {
    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` when a variable is set but cannot
    /// be parsed, or when the resulting configuration fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// Unset and blank variables fall back to defaults.
    ///
    /// # Errors
    ///
    /// See [`ServerConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut builder = ServerConfig::builder();

        if let Some(host) = get("SERVER_HOST") {
            builder = builder.host(host);
        }
        if let Some(port) = parse_var::<u16>("SERVER_PORT", get("SERVER_PORT"))? {
            builder = builder.port(port);
        }
        if let Some(enabled) = parse_bool("ENABLE_HTML_LOGGING", get("ENABLE_HTML_LOGGING"))? {
            builder = builder.html_logging(enabled);
        }
        if let Some(enabled) = parse_bool("ENABLE_CSS_LOGGING", get("ENABLE_CSS_LOGGING"))? {
            builder = builder.css_logging(enabled);
        }
        if let Some(dir) = get("HTML_LOG_DIR") {
            builder = builder.html_log_dir(dir);
        }
        if let Some(dir) = get("CSS_LOG_DIR") {
            builder = builder.css_log_dir(dir);
        }
        if let Some(bytes) = parse_var::<usize>("MAX_HTML_BYTES", get("MAX_HTML_BYTES"))? {
            builder = builder.max_html_bytes(bytes);
        }
        if let Some(origins) = get("CORS_ALLOWED_ORIGINS") {
            builder = builder.cors_allowed_origins(origins.split(','));
        }
        if let Some(path) = get("REDUCTION_PATTERNS_PATH") {
            builder = builder.patterns_path(path);
        }

        let provider = match get("COMPLETION_PROVIDER") {
            Some(name) => CompletionProvider::from_str(&name)?,
            None => CompletionProvider::default(),
        };
        builder = builder.provider(provider);

        let api_key = get(provider.api_key_env()).or_else(|| match provider {
            CompletionProvider::Gemini => get("GEMINI_API_KEY"),
            _ => None,
        });
        if let Some(key) = api_key {
            builder = builder.api_key(key);
        }
        if let Some(model) = get("COMPLETION_MODEL") {
            builder = builder.model(model);
        }
        if let Some(tokens) = parse_var::<u32>("COMPLETION_MAX_TOKENS", get("COMPLETION_MAX_TOKENS"))? {
            builder = builder.max_tokens(tokens);
        }
        if let Some(url) = get("COMPLETION_BASE_URL") {
            builder = builder.completion_base_url(url);
        }
        if let Some(secs) =
            parse_var::<u64>("COMPLETION_TIMEOUT_SECS", get("COMPLETION_TIMEOUT_SECS"))?
        {
            builder = builder.completion_timeout_secs(secs);
        }

        builder.build()
    }

    /// Log the effective configuration at start-up. The API key is never printed.
    pub fn log_summary(&self) {
        log::info!(
            "Server: {}:{} (max html {} bytes)",
            self.host,
            self.port,
            self.max_html_bytes
        );
        log::info!(
            "Completion: provider={} model={} max_tokens={} key={}",
            self.provider(),
            self.model(),
            self.completion.max_tokens(),
            if self.api_key().is_some() { "set" } else { "missing" }
        );
        if self.enable_html_logging {
            log::info!("HTML logging enabled: {}", self.html_log_dir.display());
        }
        if self.enable_css_logging {
            log::info!("CSS logging enabled: {}", self.css_log_dir.display());
        }
        if self.cors_allowed_origins.is_empty() {
            log::info!("CORS: any origin");
        } else {
            log::info!("CORS: {}", self.cors_allowed_origins.join(", "));
        }
        if let Some(path) = &self.patterns_path {
            log::info!("Reduction patterns: {}", path.display());
        }
    }
}

fn parse_var<T>(key: &str, value: Option<String>) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| ConfigError::invalid(key, &raw, e.to_string()))
        })
        .transpose()
}

/// Accepts true/false, 1/0, yes/no, on/off in any case
pub(crate) fn parse_bool(key: &str, value: Option<String>) -> Result<Option<bool>, ConfigError> {
    let Some(raw) = value else {
        return Ok(None);
    };
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(Some(true)),
        "false" | "0" | "no" | "off" => Ok(Some(false)),
        _ => Err(ConfigError::invalid(key, &raw, "expected true or false")),
    }
}
