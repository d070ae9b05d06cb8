//! Completion adapter: sends the art direction and reduced HTML to a hosted
//! language model and returns the generated CSS verbatim.
//!
//! Providers share one `reqwest::Client`. No retries happen here; callers can
//! consult [`CompletionError::is_transient`].

pub mod anthropic;
pub mod errors;
pub mod gemini;
mod http;
pub mod openrouter;
pub mod prompt;

use std::sync::Arc;

use futures::future::BoxFuture;

use crate::config::{CompletionProvider, ServerConfig};

pub use anthropic::AnthropicService;
pub use errors::{CompletionError, CompletionResult};
pub use gemini::GeminiService;
pub use openrouter::OpenRouterService;
pub use prompt::build_style_prompt;

/// A language-model backend that turns a prompt plus skeleton HTML into CSS
pub trait CompletionService: Send + Sync {
    fn provider(&self) -> CompletionProvider;

    fn model(&self) -> &str;

    /// Generate CSS for `art_direction` against `reduced_html`
    fn generate<'a>(
        &'a self,
        art_direction: &'a str,
        reduced_html: &'a str,
    ) -> BoxFuture<'a, CompletionResult<String>>;
}

/// Stand-in used when the provider has no API key; every call fails with
/// `NotConfigured` so the server can still start
pub struct UnconfiguredService {
    provider: CompletionProvider,
    model: String,
}

impl UnconfiguredService {
    #[must_use]
    pub fn new(provider: CompletionProvider, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }
}

impl CompletionService for UnconfiguredService {
    fn provider(&self) -> CompletionProvider {
        self.provider
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn generate<'a>(
        &'a self,
        _art_direction: &'a str,
        _reduced_html: &'a str,
    ) -> BoxFuture<'a, CompletionResult<String>> {
        let err = CompletionError::NotConfigured {
            provider: self.provider.as_str(),
            env_var: self.provider.api_key_env(),
        };
        Box::pin(async move { Err(err) })
    }
}

/// Build the completion service selected by `config`
///
/// # Errors
///
/// Returns `CompletionError::Transport` if the HTTP client cannot be built
/// (TLS backend initialisation failure).
pub fn build_service(config: &ServerConfig) -> CompletionResult<Arc<dyn CompletionService>> {
    let completion = config.completion();
    let provider = completion.provider();

    let Some(api_key) = completion.api_key().map(str::to_string) else {
        log::warn!(
            "{} is not set or is still the placeholder. Requests will fail until it is configured.",
            provider.api_key_env()
        );
        return Ok(Arc::new(UnconfiguredService::new(provider, completion.model())));
    };

    let client = http::build_client()?;
    let service: Arc<dyn CompletionService> = match provider {
        CompletionProvider::OpenRouter => {
            Arc::new(OpenRouterService::new(client, completion, api_key))
        }
        CompletionProvider::Anthropic => Arc::new(AnthropicService::new(client, completion, api_key)),
        CompletionProvider::Gemini => Arc::new(GeminiService::new(client, completion, api_key)),
    };
    log::info!(
        "Completion service ready: {} ({})",
        service.provider(),
        service.model()
    );
    Ok(service)
}
