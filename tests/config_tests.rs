//! Tests for environment loading and the configuration builder

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use kodegen_tools_restyle::config::{CompletionProvider, ConfigError, ServerConfig};

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_defaults_without_environment() {
    let config = ServerConfig::from_lookup(env(&[])).unwrap();

    assert_eq!(config.host(), "0.0.0.0");
    assert_eq!(config.port(), 8000);
    assert!(!config.html_logging_enabled());
    assert!(!config.css_logging_enabled());
    assert_eq!(config.html_log_dir(), Path::new("requests"));
    assert_eq!(config.css_log_dir(), Path::new("css"));
    assert_eq!(config.max_html_bytes(), 10 * 1024 * 1024);
    assert!(config.cors_allowed_origins().is_empty());
    assert!(config.patterns_path().is_none());

    let completion = config.completion();
    assert_eq!(completion.provider(), CompletionProvider::OpenRouter);
    assert_eq!(completion.model(), "openai/gpt-4.1-mini");
    assert_eq!(completion.max_tokens(), 8192);
    assert_eq!(completion.base_url(), "https://openrouter.ai/api/v1");
    assert_eq!(completion.timeout(), Duration::from_secs(60));
    assert!(completion.api_key().is_none());
}

#[test]
fn test_full_environment() {
    let config = ServerConfig::from_lookup(env(&[
        ("SERVER_HOST", "127.0.0.1"),
        ("SERVER_PORT", "9001"),
        ("ENABLE_HTML_LOGGING", "TRUE"),
        ("ENABLE_CSS_LOGGING", "yes"),
        ("HTML_LOG_DIR", "/tmp/html"),
        ("CSS_LOG_DIR", "/tmp/css"),
        ("MAX_HTML_BYTES", "2048"),
        ("CORS_ALLOWED_ORIGINS", "https://a.example, https://b.example,,"),
        ("REDUCTION_PATTERNS_PATH", "patterns.json"),
        ("COMPLETION_PROVIDER", "anthropic"),
        ("ANTHROPIC_API_KEY", "sk-ant-test"),
        ("OPENROUTER_API_KEY", "ignored"),
        ("COMPLETION_MODEL", "claude-custom"),
        ("COMPLETION_MAX_TOKENS", "1024"),
        ("COMPLETION_BASE_URL", "http://localhost:1234/"),
        ("COMPLETION_TIMEOUT_SECS", "5"),
    ]))
    .unwrap();

    assert_eq!(config.host(), "127.0.0.1");
    assert_eq!(config.port(), 9001);
    assert!(config.html_logging_enabled());
    assert!(config.css_logging_enabled());
    assert_eq!(config.html_log_dir(), Path::new("/tmp/html"));
    assert_eq!(config.css_log_dir(), Path::new("/tmp/css"));
    assert_eq!(config.max_html_bytes(), 2048);
    assert_eq!(
        config.cors_allowed_origins(),
        ["https://a.example", "https://b.example"]
    );
    assert_eq!(config.patterns_path().unwrap(), Path::new("patterns.json"));

    assert_eq!(config.provider(), CompletionProvider::Anthropic);
    assert_eq!(config.api_key(), Some("sk-ant-test"));
    assert_eq!(config.model(), "claude-custom");
    assert_eq!(config.completion().max_tokens(), 1024);
    assert_eq!(config.base_url(), "http://localhost:1234");
    assert_eq!(config.completion().timeout(), Duration::from_secs(5));
}

#[test]
fn test_placeholder_api_key_counts_as_missing() {
    let config = ServerConfig::from_lookup(env(&[("OPENROUTER_API_KEY", "YOUR_API_KEY_HERE")]))
        .unwrap();
    assert!(config.api_key().is_none());
}

#[test]
fn test_invalid_values_are_reported_with_their_key() {
    let cases = [
        ("SERVER_PORT", "eighty"),
        ("SERVER_PORT", "70000"),
        ("ENABLE_HTML_LOGGING", "sometimes"),
        ("MAX_HTML_BYTES", "-1"),
        ("MAX_HTML_BYTES", "0"),
        ("COMPLETION_PROVIDER", "llama"),
        ("COMPLETION_TIMEOUT_SECS", "0"),
        ("COMPLETION_MAX_TOKENS", "lots"),
    ];

    for (key, value) in cases {
        match ServerConfig::from_lookup(env(&[(key, value)])) {
            Err(ConfigError::InvalidValue { key: reported, .. }) => {
                assert_eq!(reported, key, "{key}={value}");
            }
            other => panic!("{key}={value} should be rejected, got {other:?}"),
        }
    }
}

#[test]
fn test_provider_aliases() {
    for (raw, expected) in [
        ("OpenRouter", CompletionProvider::OpenRouter),
        ("claude", CompletionProvider::Anthropic),
        ("google", CompletionProvider::Gemini),
    ] {
        let config = ServerConfig::from_lookup(env(&[("COMPLETION_PROVIDER", raw)])).unwrap();
        assert_eq!(config.provider(), expected);
    }
}

#[test]
fn test_provider_defaults() {
    let anthropic = ServerConfig::builder()
        .provider(CompletionProvider::Anthropic)
        .build()
        .unwrap();
    assert_eq!(anthropic.model(), "claude-3-7-sonnet-20250219");
    assert_eq!(anthropic.base_url(), "https://api.anthropic.com");

    let gemini = ServerConfig::builder()
        .provider(CompletionProvider::Gemini)
        .build()
        .unwrap();
    assert_eq!(gemini.model(), "gemini-2.5-pro-preview-03-25");
    assert_eq!(gemini.base_url(), "https://generativelanguage.googleapis.com");
}

#[test]
fn test_debug_output_redacts_api_key() {
    let config = ServerConfig::builder()
        .api_key("sk-or-very-secret")
        .build()
        .unwrap();
    let debug = format!("{config:?}");
    assert!(!debug.contains("sk-or-very-secret"));
    assert!(debug.contains("<redacted>"));

    let json = serde_json::to_string(&config).unwrap();
    assert!(!json.contains("sk-or-very-secret"));
}
