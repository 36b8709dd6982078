//! Provider clients: execute one completion against one model.
//!
//! All providers are normalised to the OpenAI-compatible response shape
//! (`choices[].message.content` plus `usage`). The Anthropic client does the
//! translation itself; everyone else speaks the shape natively.

pub mod anthropic;
pub mod openai_compat;

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::catalog::{filter_candidates, ModelProfile, PrivacySensitivity};
use crate::error::LlmError;

pub use self::anthropic::AnthropicClient;
pub use self::openai_compat::OpenAiCompatClient;

/// Overall deadline for one provider HTTP call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Supported providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenRouter,
    Google,
    Anthropic,
    OpenAi,
    DeepSeek,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 5] = [
        ProviderKind::OpenRouter,
        ProviderKind::Google,
        ProviderKind::Anthropic,
        ProviderKind::OpenAi,
        ProviderKind::DeepSeek,
    ];

    /// Parse a provider name. Unknown values fall back to openrouter.
    pub fn parse(name: &str) -> ProviderKind {
        match name {
            "openrouter" => ProviderKind::OpenRouter,
            "google" => ProviderKind::Google,
            "anthropic" => ProviderKind::Anthropic,
            "openai" => ProviderKind::OpenAi,
            "deepseek" => ProviderKind::DeepSeek,
            other => {
                if !other.is_empty() {
                    warn!(provider = other, "unknown provider name, using openrouter");
                }
                ProviderKind::OpenRouter
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenRouter => "openrouter",
            ProviderKind::Google => "google",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::OpenAi => "openai",
            ProviderKind::DeepSeek => "deepseek",
        }
    }

    /// Environment variable carrying this provider's API key.
    pub fn api_key_var(&self) -> &'static str {
        match self {
            ProviderKind::OpenRouter => "OPENROUTER_API_KEY",
            ProviderKind::Google => "GOOGLE_API_KEY",
            ProviderKind::Anthropic => "ANTHROPIC_API_KEY",
            ProviderKind::OpenAi => "OPENAI_API_KEY",
            ProviderKind::DeepSeek => "DEEPSEEK_API_KEY",
        }
    }
}

/// Message content; `None` when the provider returned null.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionChoice {
    pub message: CompletionMessage,
}

/// Token usage as reported by the provider; fields may be absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsageData {
    #[serde(default)]
    pub prompt_tokens: Option<u32>,
    #[serde(default)]
    pub completion_tokens: Option<u32>,
}

/// Normalised completion body shared by every provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionData {
    pub choices: Vec<CompletionChoice>,
    #[serde(default)]
    pub usage: Option<UsageData>,
}

/// A completion plus the measured wall-clock latency.
#[derive(Debug, Clone)]
pub struct ProviderReply {
    pub data: CompletionData,
    pub latency_ms: u64,
}

/// Provider capability consumed by the router: one completion call plus the
/// provider's own model catalogue.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Execute a single-turn completion against `model_id`.
    async fn complete(&self, prompt: &str, model_id: &str) -> Result<ProviderReply, LlmError>;

    /// The provider's full (static) catalogue.
    fn get_all(&self) -> &[ModelProfile];

    /// Catalogue entries passing the shared filter.
    fn get_candidates(
        &self,
        sensitivity: PrivacySensitivity,
        min_context_window: u32,
        max_cost_per_1m: Option<f64>,
    ) -> Vec<ModelProfile> {
        filter_candidates(
            self.get_all(),
            sensitivity,
            min_context_window,
            max_cost_per_1m,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_provider_names_fall_back_to_openrouter() {
        assert_eq!(ProviderKind::parse("anthropic"), ProviderKind::Anthropic);
        assert_eq!(ProviderKind::parse("deepseek"), ProviderKind::DeepSeek);
        assert_eq!(ProviderKind::parse("acme-llm"), ProviderKind::OpenRouter);
        assert_eq!(ProviderKind::parse(""), ProviderKind::OpenRouter);
    }

    #[test]
    fn completion_data_tolerates_null_content_and_missing_usage() {
        let body = r#"{"choices":[{"message":{"content":null}}]}"#;
        let data: CompletionData = serde_json::from_str(body).unwrap();
        assert!(data.choices[0].message.content.is_none());
        assert!(data.usage.is_none());

        let body = r#"{"choices":[{"message":{"content":"hi"}}],"usage":{"prompt_tokens":7}}"#;
        let data: CompletionData = serde_json::from_str(body).unwrap();
        assert_eq!(data.choices[0].message.content.as_deref(), Some("hi"));
        let usage = data.usage.unwrap();
        assert_eq!(usage.prompt_tokens, Some(7));
        assert_eq!(usage.completion_tokens, None);
    }
}
