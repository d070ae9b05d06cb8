//! OpenRouter (OpenAI-compatible chat completions) provider

use futures::future::BoxFuture;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::{CompletionConfig, CompletionProvider};

use super::errors::{CompletionError, CompletionResult};
use super::http::{non_empty, send_json};
use super::prompt::build_style_prompt;
use super::CompletionService;

pub struct OpenRouterService {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    timeout: Duration,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: Option<serde_json::Value>,
    #[serde(default)]
    message: String,
}

impl OpenRouterService {
    pub fn new(client: Client, config: &CompletionConfig, api_key: String) -> Self {
        Self {
            client,
            api_key,
            base_url: config.base_url().to_string(),
            model: config.model().to_string(),
            max_tokens: config.max_tokens(),
            timeout: config.timeout(),
        }
    }

    async fn request(&self, art_direction: &str, reduced_html: &str) -> CompletionResult<String> {
        let prompt = build_style_prompt(art_direction, reduced_html);
        let body = ChatRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: [ChatMessage {
                role: "user",
                content: &prompt,
            }],
        };

        let request = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body);

        let response: ChatResponse = send_json(request, self.timeout, moderation_rejection).await?;
        extract_content(response)
    }
}

/// OpenRouter answers 403 when its moderation flags the input
fn moderation_rejection(status: StatusCode, body: &str) -> Option<CompletionError> {
    (status == StatusCode::FORBIDDEN).then(|| CompletionError::ContentPolicy(body.to_string()))
}

fn extract_content(response: ChatResponse) -> CompletionResult<String> {
    // Some upstream failures arrive as 200 with an error object
    if let Some(error) = response.error {
        let status = error
            .code
            .as_ref()
            .and_then(serde_json::Value::as_u64)
            .and_then(|c| u16::try_from(c).ok())
            .unwrap_or(502);
        return Err(CompletionError::Upstream {
            status,
            body: error.message,
        });
    }

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| CompletionError::MalformedResponse("response has no choices".into()))?;

    if choice.finish_reason.as_deref() == Some("content_filter") {
        return Err(CompletionError::ContentPolicy(
            "output stopped by content filter".into(),
        ));
    }

    let content = choice
        .message
        .and_then(|m| m.content)
        .ok_or_else(|| CompletionError::MalformedResponse("choice has no message content".into()))?;
    non_empty(content)
}

impl CompletionService for OpenRouterService {
    fn provider(&self) -> CompletionProvider {
        CompletionProvider::OpenRouter
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn generate<'a>(
        &'a self,
        art_direction: &'a str,
        reduced_html: &'a str,
    ) -> BoxFuture<'a, CompletionResult<String>> {
        Box::pin(self.request(art_direction, reduced_html))
    }
}
