//! Client for OpenAI-compatible chat-completion endpoints.
//!
//! Covers openrouter, google, openai, and deepseek; they differ only in base
//! URL and catalogue. Authentication is a bearer token.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::catalog::models::catalog_for;
use crate::catalog::ModelProfile;
use crate::error::LlmError;

use super::{CompletionData, ProviderClient, ProviderKind, ProviderReply, REQUEST_TIMEOUT};

const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
const GOOGLE_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEEPSEEK_BASE_URL: &str = "https://api.deepseek.com/v1";

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

/// HTTP client for one OpenAI-compatible provider.
pub struct OpenAiCompatClient {
    http: Client,
    base_url: String,
    api_key: String,
    catalog: Vec<ModelProfile>,
    provider: ProviderKind,
}

impl OpenAiCompatClient {
    /// Build a client for `provider` with its shipped catalogue.
    pub fn new(provider: ProviderKind, api_key: String) -> Self {
        let base_url = match provider {
            ProviderKind::OpenRouter => OPENROUTER_BASE_URL,
            ProviderKind::Google => GOOGLE_BASE_URL,
            ProviderKind::OpenAi => OPENAI_BASE_URL,
            ProviderKind::DeepSeek => DEEPSEEK_BASE_URL,
            // Anthropic speaks its own protocol; see AnthropicClient.
            ProviderKind::Anthropic => OPENAI_BASE_URL,
        };
        Self {
            http: Client::new(),
            base_url: base_url.to_string(),
            api_key,
            catalog: catalog_for(provider),
            provider,
        }
    }

    /// Override the base URL, for tests and proxies.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn execute(&self, model_id: &str, prompt: &str) -> Result<CompletionData, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model: model_id,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
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

        response
            .json::<CompletionData>()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))
    }
}

#[async_trait]
impl ProviderClient for OpenAiCompatClient {
    async fn complete(&self, prompt: &str, model_id: &str) -> Result<ProviderReply, LlmError> {
        let started = Instant::now();
        let data = tokio::time::timeout(REQUEST_TIMEOUT, self.execute(model_id, prompt))
            .await
            .map_err(|_| LlmError::Timeout(REQUEST_TIMEOUT))??;
        let latency_ms = started.elapsed().as_millis() as u64;
        debug!(
            provider = self.provider.as_str(),
            model = model_id,
            latency_ms,
            "completion finished"
        );
        Ok(ProviderReply { data, latency_ms })
    }

    fn get_all(&self) -> &[ModelProfile] {
        &self.catalog
    }
}

pub(super) fn map_transport(err: reqwest::Error) -> LlmError {
    if err.is_timeout() {
        LlmError::Timeout(REQUEST_TIMEOUT)
    } else {
        LlmError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PrivacySensitivity;

    #[test]
    fn request_body_is_single_turn() {
        let body = ChatRequest {
            model: "gpt-4o-mini",
            messages: vec![ChatMessage {
                role: "user",
                content: "hello",
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"].as_array().unwrap().len(), 1);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hello");
    }

    #[test]
    fn client_owns_the_provider_catalogue() {
        let client = OpenAiCompatClient::new(ProviderKind::DeepSeek, "key".into());
        assert!(client.get_all().iter().any(|m| m.id == "deepseek-chat"));
    }

    #[test]
    fn get_candidates_applies_the_shared_filter() {
        let client = OpenAiCompatClient::new(ProviderKind::OpenAi, "key".into());
        let all = client
            .get_candidates(PrivacySensitivity::Public, 0, None)
            .len();
        let capped = client
            .get_candidates(PrivacySensitivity::Public, 0, Some(0.20))
            .len();
        assert!(capped < all);
    }

    #[tokio::test]
    async fn connection_failures_surface_as_transport_errors() {
        let client = OpenAiCompatClient::new(ProviderKind::OpenAi, "key".into())
            .with_base_url("http://127.0.0.1:9/v1");
        let err = client.complete("hi", "gpt-4o-mini").await.unwrap_err();
        assert!(matches!(
            err,
            LlmError::Transport(_) | LlmError::Timeout(_)
        ));
    }
}
