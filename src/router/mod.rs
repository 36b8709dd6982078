//! Router orchestrator: classification, candidate assembly, fallback chain.
//!
//! Ties the classifier, provider catalogue, ranking strategies, per-model
//! circuit breakers, retry driver, and audit sink into the request lifecycle.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::warn;

use crate::audit::{AuditEntry, AuditSink};
use crate::breaker::{BreakerConfig, CircuitBreaker};
use crate::catalog::{ModelProfile, PrivacySensitivity, StrategyKind, TaskCategory};
use crate::classifier::{ClassificationResult, ClassificationSource, Classifier};
use crate::embedding::{estimate_tokens, fingerprint};
use crate::error::{LlmError, RouterError};
use crate::metrics;
use crate::providers::ProviderClient;
use crate::retry::{with_retry, RetryPolicy};
use crate::strategy::strategy_for;

/// Below this confidence the inferred category is discarded and the prompt
/// routes as `reasoning`.
pub const CONFIDENCE_MIN: f64 = 0.5;

/// Per-request routing preferences.
///
/// The default sensitivity is `internal`: the engine assumes prompts are not
/// public unless the caller says so.
#[derive(Debug, Clone)]
pub struct RoutingOptions {
    pub strategy: StrategyKind,
    pub sensitivity: PrivacySensitivity,
    /// Minimum context window a candidate must offer.
    pub require_context_window: u32,
    /// Cap on `cost_per_1m_input`, USD.
    pub max_cost_per_1m_tokens: Option<f64>,
    /// Skip classification and route as this category.
    pub force_category: Option<TaskCategory>,
    /// Skip filtering and ranking; must name a model the provider knows.
    pub force_model: Option<String>,
}

impl Default for RoutingOptions {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::Balanced,
            sensitivity: PrivacySensitivity::Internal,
            require_context_window: 0,
            max_cost_per_1m_tokens: None,
            force_category: None,
            force_model: None,
        }
    }
}

/// Token usage for one completion.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// The routed completion returned to the caller.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmResponse {
    pub content: String,
    /// Model id actually used.
    pub model: String,
    pub category: TaskCategory,
    pub estimated_cost_usd: f64,
    pub latency_ms: u64,
    pub usage: TokenUsage,
    /// True when the model used was not the first ranked candidate.
    pub fallback_used: bool,
}

/// Orchestrates one completion end to end.
pub struct RouterEngine {
    classifier: Arc<dyn Classifier>,
    provider: Arc<dyn ProviderClient>,
    audit: Arc<dyn AuditSink>,
    /// One breaker per model id, created lazily.
    breakers: Mutex<HashMap<String, Arc<CircuitBreaker>>>,
    retry: RetryPolicy,
    breaker_config: BreakerConfig,
}

impl RouterEngine {
    pub fn new(
        classifier: Arc<dyn Classifier>,
        provider: Arc<dyn ProviderClient>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            classifier,
            provider,
            audit,
            breakers: Mutex::new(HashMap::new()),
            retry: RetryPolicy::default(),
            breaker_config: BreakerConfig::default(),
        }
    }

    /// Override the retry policy (tests, tuning).
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Override the breaker thresholds (tests, tuning).
    pub fn with_breaker_config(mut self, config: BreakerConfig) -> Self {
        self.breaker_config = config;
        self
    }

    /// Route one prompt to one model and return its completion.
    pub async fn complete(
        &self,
        prompt: &str,
        opts: &RoutingOptions,
    ) -> Result<LlmResponse, RouterError> {
        let classification = self.classification_for(prompt, opts).await?;
        let candidates = self.assemble_candidates(opts, classification.category)?;

        let mut last_error: Option<LlmError> = None;
        for (rank, model) in candidates.iter().enumerate() {
            let breaker = self.breaker_for(&model.id);
            let outcome = with_retry(&self.retry, || {
                self.provider.complete(prompt, &model.id)
            })
            .await;

            match outcome {
                Ok(reply) => {
                    breaker.record_success();
                    let response = build_response(model, rank, &classification, reply);
                    metrics::record_request(response.category.as_str(), &response.model, "ok");
                    metrics::observe_latency(&response.model, response.latency_ms);
                    if response.fallback_used {
                        metrics::record_fallback();
                    }
                    self.dispatch_audit(prompt, &classification, &response);
                    return Ok(response);
                }
                Err(err) => {
                    breaker.record_failure();
                    metrics::record_request(classification.category.as_str(), &model.id, "error");
                    warn!(model = %model.id, error = %err, "candidate failed, trying next in fallback chain");
                    last_error = Some(err);
                }
            }
        }

        Err(RouterError::AllModelsFailed {
            attempted: candidates.len(),
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no candidates tried".to_string()),
        })
    }

    /// Record an operator-corrected (prompt, category) pair.
    pub async fn feedback(
        &self,
        prompt: &str,
        category: TaskCategory,
    ) -> Result<(), RouterError> {
        self.classifier.add_example(prompt, category).await?;
        Ok(())
    }

    async fn classification_for(
        &self,
        prompt: &str,
        opts: &RoutingOptions,
    ) -> Result<ClassificationResult, RouterError> {
        let mut classification = match opts.force_category {
            Some(category) => ClassificationResult {
                category,
                confidence: 1.0,
                scores: BTreeMap::new(),
                signals: Vec::new(),
                estimated_input_tokens: estimate_tokens(prompt),
                source: ClassificationSource::Semantic,
            },
            None => self.classifier.classify(prompt).await?,
        };

        // Unknown -> think harder: uncertain prompts route as reasoning
        // without any external classifier call.
        if classification.confidence < CONFIDENCE_MIN {
            warn!(
                category = %classification.category,
                confidence = classification.confidence,
                "low-confidence classification, escalating to reasoning"
            );
            classification.category = TaskCategory::Reasoning;
        }
        Ok(classification)
    }

    fn assemble_candidates(
        &self,
        opts: &RoutingOptions,
        category: TaskCategory,
    ) -> Result<Vec<ModelProfile>, RouterError> {
        let candidates = match &opts.force_model {
            Some(id) => {
                let model = self
                    .provider
                    .get_all()
                    .iter()
                    .find(|m| &m.id == id)
                    .cloned()
                    .ok_or_else(|| RouterError::UnknownModel(id.clone()))?;
                vec![model]
            }
            None => {
                let filtered = self.provider.get_candidates(
                    opts.sensitivity,
                    opts.require_context_window,
                    opts.max_cost_per_1m_tokens,
                );
                let ranked = strategy_for(opts.strategy).select(&filtered, category);
                ranked
                    .into_iter()
                    .filter(|model| self.breaker_for(&model.id).can_execute())
                    .collect()
            }
        };

        if candidates.is_empty() {
            return Err(RouterError::NoModelsAvailable);
        }
        Ok(candidates)
    }

    /// One breaker per model id, created on first sight.
    fn breaker_for(&self, model_id: &str) -> Arc<CircuitBreaker> {
        let mut breakers = self.breakers.lock().expect("breaker map poisoned");
        Arc::clone(breakers.entry(model_id.to_string()).or_insert_with(|| {
            Arc::new(CircuitBreaker::new(model_id, self.breaker_config.clone()))
        }))
    }

    /// Fire-and-forget audit append; failures are logged and dropped.
    fn dispatch_audit(
        &self,
        prompt: &str,
        classification: &ClassificationResult,
        response: &LlmResponse,
    ) {
        let entry = AuditEntry {
            prompt_hash: format!("{:x}", fingerprint(prompt)),
            prompt_preview: AuditEntry::preview_of(prompt),
            category: response.category,
            confidence: classification.confidence,
            source: classification.source,
            model: response.model.clone(),
            cost_usd: response.estimated_cost_usd,
            latency_ms: response.latency_ms,
        };
        let sink = Arc::clone(&self.audit);
        tokio::spawn(async move {
            if let Err(err) = sink.insert(entry).await {
                warn!(%err, "audit insert failed, dropping entry");
            }
        });
    }
}

fn build_response(
    model: &ModelProfile,
    rank: usize,
    classification: &ClassificationResult,
    reply: crate::providers::ProviderReply,
) -> LlmResponse {
    let usage = reply.data.usage.as_ref();
    let input_tokens = usage
        .and_then(|u| u.prompt_tokens)
        .unwrap_or(classification.estimated_input_tokens);
    let output_tokens = usage.and_then(|u| u.completion_tokens).unwrap_or(0);
    let content = reply
        .data
        .choices
        .first()
        .and_then(|choice| choice.message.content.clone())
        .unwrap_or_default();

    LlmResponse {
        content,
        model: model.id.clone(),
        category: classification.category,
        estimated_cost_usd: model.estimate_cost(input_tokens, output_tokens),
        latency_ms: reply.latency_ms,
        usage: TokenUsage {
            input_tokens,
            output_tokens,
        },
        fallback_used: rank != 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{CompletionChoice, CompletionData, CompletionMessage, ProviderReply, UsageData};

    fn reply(content: Option<&str>, usage: Option<(Option<u32>, Option<u32>)>) -> ProviderReply {
        ProviderReply {
            data: CompletionData {
                choices: vec![CompletionChoice {
                    message: CompletionMessage {
                        content: content.map(String::from),
                    },
                }],
                usage: usage.map(|(prompt_tokens, completion_tokens)| UsageData {
                    prompt_tokens,
                    completion_tokens,
                }),
            },
            latency_ms: 200,
        }
    }

    fn classification(estimated: u32) -> ClassificationResult {
        ClassificationResult {
            category: TaskCategory::Simple,
            confidence: 0.9,
            scores: BTreeMap::new(),
            signals: Vec::new(),
            estimated_input_tokens: estimated,
            source: ClassificationSource::Semantic,
        }
    }

    #[test]
    fn missing_usage_falls_back_to_estimate_and_zero() {
        let model = ModelProfile::new("m", "m").with_pricing(2.0, 6.0);
        let response = build_response(&model, 0, &classification(123), reply(Some("hi"), None));
        assert_eq!(response.usage.input_tokens, 123);
        assert_eq!(response.usage.output_tokens, 0);
        assert!(!response.fallback_used);
    }

    #[test]
    fn null_content_becomes_empty_string() {
        let model = ModelProfile::new("m", "m");
        let response = build_response(&model, 1, &classification(1), reply(None, Some((Some(5), Some(2)))));
        assert_eq!(response.content, "");
        assert!(response.fallback_used);
    }

    #[test]
    fn cost_math_matches_the_price_sheet() {
        let model = ModelProfile::new("m", "m").with_pricing(2.0, 6.0);
        let response = build_response(
            &model,
            0,
            &classification(1),
            reply(Some("x"), Some((Some(500), Some(100)))),
        );
        assert!((response.estimated_cost_usd - 0.0016).abs() < 1e-6);
    }
}
