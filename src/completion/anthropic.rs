//! Anthropic Messages API provider

use futures::future::BoxFuture;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::{CompletionConfig, CompletionProvider};

use super::errors::{CompletionError, CompletionResult};
use super::http::{no_policy, non_empty, send_json};
use super::prompt::build_style_prompt;
use super::CompletionService;

const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct AnthropicService {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    timeout: Duration,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [Message<'a>; 1],
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: Option<String>,
}

impl AnthropicService {
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
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: [Message {
                role: "user",
                content: &prompt,
            }],
        };

        let request = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body);

        let response: MessagesResponse = send_json(request, self.timeout, no_policy).await?;
        extract_text(response)
    }
}

fn extract_text(response: MessagesResponse) -> CompletionResult<String> {
    if response.stop_reason.as_deref() == Some("refusal") {
        return Err(CompletionError::ContentPolicy("model refused the request".into()));
    }

    let text: String = response
        .content
        .into_iter()
        .filter(|block| block.block_type == "text")
        .filter_map(|block| block.text)
        .collect();
    non_empty(text)
}

impl CompletionService for AnthropicService {
    fn provider(&self) -> CompletionProvider {
        CompletionProvider::Anthropic
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joins_text_blocks() {
        let response: MessagesResponse = serde_json::from_str(
            r#"{"content":[{"type":"text","text":"a { }"},{"type":"tool_use","id":"x"},{"type":"text","text":"\nb { }"}],"stop_reason":"end_turn"}"#,
        )
        .unwrap();
        assert_eq!(extract_text(response).unwrap(), "a { }\nb { }");
    }

    #[test]
    fn test_refusal() {
        let response: MessagesResponse =
            serde_json::from_str(r#"{"content":[],"stop_reason":"refusal"}"#).unwrap();
        assert!(matches!(
            extract_text(response),
            Err(CompletionError::ContentPolicy(_))
        ));
    }

    #[test]
    fn test_no_text_is_empty_response() {
        let response: MessagesResponse =
            serde_json::from_str(r#"{"content":[],"stop_reason":"end_turn"}"#).unwrap();
        assert!(matches!(extract_text(response), Err(CompletionError::EmptyResponse)));
    }
}
