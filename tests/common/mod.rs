//! Test utilities and helper functions for the restyle test suite

use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;
use kodegen_tools_restyle::completion::{CompletionError, CompletionResult, CompletionService};
use kodegen_tools_restyle::config::{CompletionProvider, ServerConfig};
use kodegen_tools_restyle::html_reduction::ReductionPatterns;
use kodegen_tools_restyle::server::AppState;

type Responder = Box<dyn Fn() -> CompletionResult<String> + Send + Sync>;

/// Completion service double that records every call
#[allow(dead_code)]
pub struct FakeCompletion {
    responder: Responder,
    calls: Mutex<Vec<(String, String)>>,
}

#[allow(dead_code)]
impl FakeCompletion {
    pub fn replying(css: &str) -> Arc<Self> {
        let css = css.to_string();
        Arc::new(Self {
            responder: Box::new(move || Ok(css.clone())),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(make_error: fn() -> CompletionError) -> Arc<Self> {
        Arc::new(Self {
            responder: Box::new(move || Err(make_error())),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// `(art_direction, reduced_html)` pairs seen so far
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl CompletionService for FakeCompletion {
    fn provider(&self) -> CompletionProvider {
        CompletionProvider::OpenRouter
    }

    fn model(&self) -> &str {
        "fake-model"
    }

    fn generate<'a>(
        &'a self,
        art_direction: &'a str,
        reduced_html: &'a str,
    ) -> BoxFuture<'a, CompletionResult<String>> {
        self.calls
            .lock()
            .unwrap()
            .push((art_direction.to_string(), reduced_html.to_string()));
        let result = (self.responder)();
        Box::pin(async move { result })
    }
}

/// Config pointing `provider` at a local mock server
#[allow(dead_code)]
pub fn provider_config(provider: CompletionProvider, base_url: &str) -> ServerConfig {
    ServerConfig::builder()
        .provider(provider)
        .api_key("test-key")
        .completion_base_url(base_url)
        .completion_timeout_secs(5)
        .build()
        .unwrap()
}

/// App state with built-in patterns and the given completion double
#[allow(dead_code)]
pub fn test_state(config: ServerConfig, completion: Arc<FakeCompletion>) -> AppState {
    AppState::new(config, ReductionPatterns::builtin().clone(), completion)
}

/// Creates a test HTML document with specified content
#[allow(dead_code)]
pub fn create_test_html(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{}</title>
    <link rel="stylesheet" href="/main.css">
    <style>body {{ margin: 0; }}</style>
    <script src="/analytics.js"></script>
</head>
<body>
    {}
</body>
</html>"#,
        html_escape::encode_text(title),
        body
    )
}

/// A page shaped like a typical app shell: tracking attributes, icons,
/// spinners, wrappers and inline scripts around a little real content
#[allow(dead_code)]
pub fn create_app_shell_html() -> String {
    create_test_html(
        "Feed",
        r##"<div id="app" data-reactroot="" data-testid="root">
      <!-- header -->
      <header class="top-bar" role="banner" aria-label="Site header" itemscope itemtype="https://schema.org/WPHeader">
        <a href="/home" class="logo" data-track="logo-click" jslog="12345">
          <svg viewBox="0 0 24 24"><path d="M12 2L2 7l10 5 10-5-10-5z"/><circle cx="12" cy="12" r="3"/></svg>
          Home
        </a>
        <nav class="menu"><div><div><ul><li><a href="/a" aria-current="page">A</a></li><li><a href="javascript:void(0)">B</a></li></ul></div></div></nav>
      </header>
      <div class="loading-spinner"><div class="dot"></div></div>
      <div hidden><p>Offscreen template</p></div>
      <main class="content">
        <div><div><div></div><div>   </div><p class="post" data-post-id="99">Hello <b>world</b></p></div></div>
        <img src="[sanitized-image]" class="avatar" alt="me">
        <script>window.__STATE__ = {"user": 1};</script>
      </main>
      <div role="tooltip" class="tooltip">Tip</div>
    </div>"##,
    )
}
