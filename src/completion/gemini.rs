//! Google Gemini `generateContent` provider

use futures::future::BoxFuture;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::{CompletionConfig, CompletionProvider};

use super::errors::{CompletionError, CompletionResult};
use super::http::{no_policy, non_empty, send_json};
use super::prompt::build_style_prompt;
use super::CompletionService;

pub struct GeminiService {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    timeout: Duration,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

/// Finish reasons that mean the output was withheld on policy grounds
const BLOCKED_FINISH_REASONS: &[&str] = &["SAFETY", "RECITATION", "BLOCKLIST", "PROHIBITED_CONTENT", "SPII"];

impl GeminiService {
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
        let body = GenerateRequest {
            contents: [Content {
                role: "user",
                parts: [Part { text: &prompt }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: self.max_tokens,
            },
        };

        let request = self
            .client
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.base_url, self.model
            ))
            .header("x-goog-api-key", &self.api_key)
            .json(&body);

        let response: GenerateResponse = send_json(request, self.timeout, no_policy).await?;
        extract_text(response)
    }
}

fn extract_text(response: GenerateResponse) -> CompletionResult<String> {
    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(CompletionError::ContentPolicy(format!("prompt blocked: {reason}")));
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| CompletionError::MalformedResponse("response has no candidates".into()))?;

    if let Some(reason) = candidate
        .finish_reason
        .as_deref()
        .filter(|reason| BLOCKED_FINISH_REASONS.contains(reason))
    {
        return Err(CompletionError::ContentPolicy(format!("output blocked: {reason}")));
    }

    let text: String = candidate
        .content
        .map(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|p| p.text)
        .collect();
    non_empty(text)
}

impl CompletionService for GeminiService {
    fn provider(&self) -> CompletionProvider {
        CompletionProvider::Gemini
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
