//! Starting model catalogues, one per supported provider.
//!
//! These lists mirror the tables in the README, which are the authoritative
//! starting catalogue. Pricing is USD per one million tokens; quality scores
//! are per-category in 0..=10 ordered simple / code / reasoning /
//! data_analysis / creative.

use super::{LatencyTier, ModelProfile, ModelTier, QualityScores, TaskCategory};
use crate::providers::ProviderKind;

/// Catalogue for the given provider.
pub fn catalog_for(provider: ProviderKind) -> Vec<ModelProfile> {
    match provider {
        ProviderKind::OpenRouter => openrouter_catalog(),
        ProviderKind::Google => google_catalog(),
        ProviderKind::Anthropic => anthropic_catalog(),
        ProviderKind::OpenAi => openai_catalog(),
        ProviderKind::DeepSeek => deepseek_catalog(),
    }
}

/// OpenRouter aggregates several upstreams; ids carry the upstream prefix.
pub fn openrouter_catalog() -> Vec<ModelProfile> {
    vec![
        ModelProfile::new("openai/gpt-4o-mini", "GPT-4o mini")
            .with_tier(ModelTier::General)
            .with_pricing(0.15, 0.60)
            .with_context_window(128_000)
            .with_strengths(vec![TaskCategory::Simple, TaskCategory::Creative])
            .with_latency_tier(LatencyTier::Fast)
            .with_quality(QualityScores::new(8, 6, 5, 6, 7)),
        ModelProfile::new("google/gemini-2.0-flash-001", "Gemini 2.0 Flash")
            .with_tier(ModelTier::General)
            .with_pricing(0.10, 0.40)
            .with_context_window(1_000_000)
            .with_strengths(vec![TaskCategory::Simple, TaskCategory::DataAnalysis])
            .with_latency_tier(LatencyTier::Fast)
            .with_quality(QualityScores::new(8, 6, 6, 7, 6)),
        ModelProfile::new("anthropic/claude-3.5-haiku", "Claude 3.5 Haiku")
            .with_tier(ModelTier::General)
            .with_pricing(0.80, 4.00)
            .with_context_window(200_000)
            .with_strengths(vec![TaskCategory::Simple, TaskCategory::Code])
            .with_sensitive_support()
            .with_latency_tier(LatencyTier::Fast)
            .with_quality(QualityScores::new(8, 7, 6, 6, 7)),
        ModelProfile::new("deepseek/deepseek-chat", "DeepSeek V3")
            .with_tier(ModelTier::Medium)
            .with_pricing(0.27, 1.10)
            .with_context_window(64_000)
            .with_strengths(vec![TaskCategory::Code, TaskCategory::DataAnalysis])
            .with_latency_tier(LatencyTier::Medium)
            .with_quality(QualityScores::new(7, 8, 7, 7, 6)),
        ModelProfile::new("anthropic/claude-sonnet-4", "Claude Sonnet 4")
            .with_tier(ModelTier::Medium)
            .with_pricing(3.00, 15.00)
            .with_context_window(200_000)
            .with_strengths(vec![TaskCategory::Code, TaskCategory::Creative])
            .with_sensitive_support()
            .with_latency_tier(LatencyTier::Medium)
            .with_quality(QualityScores::new(8, 9, 8, 8, 9)),
        ModelProfile::new("deepseek/deepseek-r1", "DeepSeek R1")
            .with_tier(ModelTier::Hard)
            .with_pricing(0.55, 2.19)
            .with_context_window(64_000)
            .with_strengths(vec![TaskCategory::Reasoning, TaskCategory::DataAnalysis])
            .with_latency_tier(LatencyTier::Slow)
            .with_quality(QualityScores::new(6, 8, 9, 8, 6)),
        ModelProfile::new("openai/o3-mini", "o3-mini")
            .with_tier(ModelTier::Hard)
            .with_pricing(1.10, 4.40)
            .with_context_window(200_000)
            .with_strengths(vec![TaskCategory::Reasoning, TaskCategory::Code])
            .with_latency_tier(LatencyTier::Slow)
            .with_quality(QualityScores::new(6, 8, 9, 8, 6)),
    ]
}

pub fn google_catalog() -> Vec<ModelProfile> {
    vec![
        ModelProfile::new("gemini-2.0-flash", "Gemini 2.0 Flash")
            .with_tier(ModelTier::General)
            .with_pricing(0.10, 0.40)
            .with_context_window(1_000_000)
            .with_strengths(vec![TaskCategory::Simple, TaskCategory::DataAnalysis])
            .with_sensitive_support()
            .with_latency_tier(LatencyTier::Fast)
            .with_quality(QualityScores::new(8, 6, 6, 7, 6)),
        ModelProfile::new("gemini-2.5-flash", "Gemini 2.5 Flash")
            .with_tier(ModelTier::Medium)
            .with_pricing(0.30, 2.50)
            .with_context_window(1_000_000)
            .with_strengths(vec![TaskCategory::Code, TaskCategory::DataAnalysis])
            .with_sensitive_support()
            .with_latency_tier(LatencyTier::Fast)
            .with_quality(QualityScores::new(8, 7, 7, 8, 7)),
        ModelProfile::new("gemini-2.5-pro", "Gemini 2.5 Pro")
            .with_tier(ModelTier::Hard)
            .with_pricing(1.25, 10.00)
            .with_context_window(1_000_000)
            .with_strengths(vec![TaskCategory::Reasoning, TaskCategory::Code])
            .with_sensitive_support()
            .with_latency_tier(LatencyTier::Slow)
            .with_quality(QualityScores::new(7, 9, 9, 9, 8)),
    ]
}

pub fn anthropic_catalog() -> Vec<ModelProfile> {
    vec![
        ModelProfile::new("claude-3-5-haiku-20241022", "Claude 3.5 Haiku")
            .with_tier(ModelTier::General)
            .with_pricing(0.80, 4.00)
            .with_context_window(200_000)
            .with_strengths(vec![TaskCategory::Simple, TaskCategory::Code])
            .with_sensitive_support()
            .with_latency_tier(LatencyTier::Fast)
            .with_quality(QualityScores::new(8, 7, 6, 6, 7)),
        ModelProfile::new("claude-sonnet-4-20250514", "Claude Sonnet 4")
            .with_tier(ModelTier::Medium)
            .with_pricing(3.00, 15.00)
            .with_context_window(200_000)
            .with_strengths(vec![TaskCategory::Code, TaskCategory::Creative])
            .with_sensitive_support()
            .with_latency_tier(LatencyTier::Medium)
            .with_quality(QualityScores::new(8, 9, 8, 8, 9)),
        ModelProfile::new("claude-opus-4-20250514", "Claude Opus 4")
            .with_tier(ModelTier::Hard)
            .with_pricing(15.00, 75.00)
            .with_context_window(200_000)
            .with_strengths(vec![TaskCategory::Reasoning, TaskCategory::Creative])
            .with_sensitive_support()
            .with_latency_tier(LatencyTier::Slow)
            .with_quality(QualityScores::new(8, 9, 10, 9, 9)),
    ]
}

pub fn openai_catalog() -> Vec<ModelProfile> {
    vec![
        ModelProfile::new("gpt-4o-mini", "GPT-4o mini")
            .with_tier(ModelTier::General)
            .with_pricing(0.15, 0.60)
            .with_context_window(128_000)
            .with_strengths(vec![TaskCategory::Simple, TaskCategory::Creative])
            .with_sensitive_support()
            .with_latency_tier(LatencyTier::Fast)
            .with_quality(QualityScores::new(8, 6, 5, 6, 7)),
        ModelProfile::new("gpt-4o", "GPT-4o")
            .with_tier(ModelTier::Medium)
            .with_pricing(2.50, 10.00)
            .with_context_window(128_000)
            .with_strengths(vec![TaskCategory::Code, TaskCategory::Creative])
            .with_sensitive_support()
            .with_latency_tier(LatencyTier::Medium)
            .with_quality(QualityScores::new(8, 8, 7, 8, 8)),
        ModelProfile::new("o3-mini", "o3-mini")
            .with_tier(ModelTier::Hard)
            .with_pricing(1.10, 4.40)
            .with_context_window(200_000)
            .with_strengths(vec![TaskCategory::Reasoning, TaskCategory::Code])
            .with_sensitive_support()
            .with_latency_tier(LatencyTier::Slow)
            .with_quality(QualityScores::new(6, 8, 9, 8, 6)),
    ]
}

pub fn deepseek_catalog() -> Vec<ModelProfile> {
    vec![
        ModelProfile::new("deepseek-chat", "DeepSeek V3")
            .with_tier(ModelTier::General)
            .with_pricing(0.27, 1.10)
            .with_context_window(64_000)
            .with_strengths(vec![TaskCategory::Simple, TaskCategory::Code])
            .with_latency_tier(LatencyTier::Fast)
            .with_quality(QualityScores::new(7, 8, 7, 7, 6)),
        ModelProfile::new("deepseek-reasoner", "DeepSeek R1")
            .with_tier(ModelTier::Hard)
            .with_pricing(0.55, 2.19)
            .with_context_window(64_000)
            .with_strengths(vec![TaskCategory::Reasoning, TaskCategory::DataAnalysis])
            .with_latency_tier(LatencyTier::Slow)
            .with_quality(QualityScores::new(6, 8, 9, 8, 6)),
    ]
}
