//! Anthropic Messages API client with response normalisation.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::models::anthropic_catalog;
use crate::catalog::ModelProfile;
use crate::error::LlmError;

use super::openai_compat::map_transport;
use super::{
    CompletionChoice, CompletionData, CompletionMessage, ProviderClient, ProviderReply, UsageData,
    REQUEST_TIMEOUT,
};

const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 8096;

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<MessageBody<'a>>,
}

#[derive(Debug, Serialize)]
struct MessageBody<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    usage: Option<AnthropicUsage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    #[serde(default)]
    input_tokens: Option<u32>,
    #[serde(default)]
    output_tokens: Option<u32>,
}

/// Anthropic client; exposes the same normalised shape as everyone else.
pub struct AnthropicClient {
    http: Client,
    base_url: String,
    api_key: String,
    catalog: Vec<ModelProfile>,
}

impl AnthropicClient {
    pub fn new(api_key: String) -> Self {
        Self {
            http: Client::new(),
            base_url: ANTHROPIC_BASE_URL.to_string(),
            api_key,
            catalog: anthropic_catalog(),
        }
    }

    /// Override the base URL, for tests and proxies.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn execute(&self, model_id: &str, prompt: &str) -> Result<CompletionData, LlmError> {
        let url = format!("{}/messages", self.base_url);
        let body = MessagesRequest {
            model: model_id,
            max_tokens: MAX_TOKENS,
            messages: vec![MessageBody {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .http
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(map_transport)?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error response".to_string());
            return Err(LlmError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let parsed = response
            .json::<MessagesResponse>()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;
        Ok(normalise(parsed))
    }
}

/// Translate the Messages API shape into the common completion shape.
fn normalise(response: MessagesResponse) -> CompletionData {
    let text: Vec<&str> = response
        .content
        .iter()
        .filter(|block| block.kind == "text")
        .filter_map(|block| block.text.as_deref())
        .collect();
    let content = if text.is_empty() {
        None
    } else {
        Some(text.join(""))
    };

    CompletionData {
        choices: vec![CompletionChoice {
            message: CompletionMessage { content },
        }],
        usage: response.usage.map(|usage| UsageData {
            prompt_tokens: usage.input_tokens,
            completion_tokens: usage.output_tokens,
        }),
    }
}

#[async_trait]
impl ProviderClient for AnthropicClient {
    async fn complete(&self, prompt: &str, model_id: &str) -> Result<ProviderReply, LlmError> {
        let started = Instant::now();
        let data = tokio::time::timeout(REQUEST_TIMEOUT, self.execute(model_id, prompt))
            .await
            .map_err(|_| LlmError::Timeout(REQUEST_TIMEOUT))??;
        let latency_ms = started.elapsed().as_millis() as u64;
        debug!(provider = "anthropic", model = model_id, latency_ms, "completion finished");
        Ok(ProviderReply { data, latency_ms })
    }

    fn get_all(&self) -> &[ModelProfile] {
        &self.catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_carries_protocol_constants() {
        let body = MessagesRequest {
            model: "claude-sonnet-4-20250514",
            max_tokens: MAX_TOKENS,
            messages: vec![MessageBody {
                role: "user",
                content: "hi",
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["max_tokens"], 8096);
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn normalise_joins_text_blocks_and_maps_usage() {
        let raw = r#"{
            "content": [
                {"type": "text", "text": "Hello "},
                {"type": "tool_use"},
                {"type": "text", "text": "world"}
            ],
            "usage": {"input_tokens": 12, "output_tokens": 4}
        }"#;
        let parsed: MessagesResponse = serde_json::from_str(raw).unwrap();
        let data = normalise(parsed);
        assert_eq!(
            data.choices[0].message.content.as_deref(),
            Some("Hello world")
        );
        let usage = data.usage.unwrap();
        assert_eq!(usage.prompt_tokens, Some(12));
        assert_eq!(usage.completion_tokens, Some(4));
    }

    #[test]
    fn normalise_maps_empty_content_to_null() {
        let parsed: MessagesResponse = serde_json::from_str(r#"{"content": []}"#).unwrap();
        let data = normalise(parsed);
        assert!(data.choices[0].message.content.is_none());
        assert!(data.usage.is_none());
    }
}
