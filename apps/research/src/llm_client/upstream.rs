//! Chat-completion transport.
//!
//! `ChatUpstream` is the seam between the gateway and the network. The gateway
//! owns budget and admission; an upstream only turns one request into one
//! completion text or a failure.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::LlmError;

/// Model and sampling parameters for one call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub model: String,
    pub max_output_tokens: u32,
    pub temperature: f64,
}

impl GenerationParams {
    pub fn new(model: &str, max_output_tokens: u32, temperature: f64) -> Self {
        Self {
            model: model.to_string(),
            max_output_tokens,
            temperature,
        }
    }
}

#[async_trait]
pub trait ChatUpstream: Send + Sync {
    /// Sends one system + user exchange and returns the completion text.
    async fn complete(
        &self,
        system: &str,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl ChatResponse {
    fn into_text(self) -> Option<String> {
        self.choices.into_iter().next().and_then(|c| c.message.content)
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// OpenAI-compatible `/chat/completions` endpoint with bearer authentication.
#[derive(Clone)]
pub struct OpenAiUpstream {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl OpenAiUpstream {
    pub fn new(base_url: &str, api_key: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key,
        })
    }
}

#[async_trait]
impl ChatUpstream for OpenAiUpstream {
    async fn complete(
        &self,
        system: &str,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, LlmError> {
        let body = build_request(system, prompt, params);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::UpstreamCallFailed(format!("HTTP error: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::UpstreamCallFailed(format!(
                "API error (status {}): {}",
                status.as_u16(),
                api_error_message(&body)
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::UpstreamCallFailed(format!("Malformed API response: {e}")))?;

        parsed
            .into_text()
            .ok_or_else(|| LlmError::UpstreamCallFailed("API returned no completion text".into()))
    }
}

fn build_request<'a>(
    system: &'a str,
    prompt: &'a str,
    params: &'a GenerationParams,
) -> ChatRequest<'a> {
    ChatRequest {
        model: &params.model,
        messages: vec![
            ChatMessage {
                role: "system",
                content: system,
            },
            ChatMessage {
                role: "user",
                content: prompt,
            },
        ],
        max_tokens: params.max_output_tokens,
        temperature: params.temperature,
    }
}

/// Pulls `error.message` out of an API error body, or returns the body as-is.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiError>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string())
}
