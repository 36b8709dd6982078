//! Model catalogue data model and the shared candidate filter.
//!
//! Each provider client owns a static list of [`ModelProfile`]s; the filter
//! applied before ranking is identical across providers and lives here. The
//! concrete per-provider lists are in [`models`].

pub mod models;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Task category inferred for a prompt.
///
/// The set is closed: adding a category requires updating every model's
/// quality scores and the seed corpus. Declaration order is the canonical
/// iteration order and doubles as the tie-break order wherever category
/// scores are compared.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    Simple,
    Code,
    Reasoning,
    DataAnalysis,
    Creative,
}

impl TaskCategory {
    /// All categories in declaration order.
    pub const ALL: [TaskCategory; 5] = [
        TaskCategory::Simple,
        TaskCategory::Code,
        TaskCategory::Reasoning,
        TaskCategory::DataAnalysis,
        TaskCategory::Creative,
    ];

    /// Wire name of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskCategory::Simple => "simple",
            TaskCategory::Code => "code",
            TaskCategory::Reasoning => "reasoning",
            TaskCategory::DataAnalysis => "data_analysis",
            TaskCategory::Creative => "creative",
        }
    }

    /// Parse a wire name; `None` for anything outside the closed set.
    pub fn parse(name: &str) -> Option<TaskCategory> {
        match name {
            "simple" => Some(TaskCategory::Simple),
            "code" => Some(TaskCategory::Code),
            "reasoning" => Some(TaskCategory::Reasoning),
            "data_analysis" => Some(TaskCategory::DataAnalysis),
            "creative" => Some(TaskCategory::Creative),
            _ => None,
        }
    }

    /// Position within [`TaskCategory::ALL`].
    pub fn index(self) -> usize {
        match self {
            TaskCategory::Simple => 0,
            TaskCategory::Code => 1,
            TaskCategory::Reasoning => 2,
            TaskCategory::DataAnalysis => 3,
            TaskCategory::Creative => 4,
        }
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Privacy sensitivity of a prompt. `internal` and `sensitive` filter
/// identically; only `public` admits models without sensitive support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrivacySensitivity {
    Public,
    Internal,
    Sensitive,
}

impl PrivacySensitivity {
    /// True when the sensitivity restricts model selection.
    pub fn is_restricted(self) -> bool {
        matches!(
            self,
            PrivacySensitivity::Internal | PrivacySensitivity::Sensitive
        )
    }
}

/// Ranking strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    CostFirst,
    QualityFirst,
    Balanced,
}

impl StrategyKind {
    /// Parse a strategy name. Unknown names fall back to `balanced`.
    pub fn parse(name: &str) -> StrategyKind {
        match name {
            "cost_first" => StrategyKind::CostFirst,
            "quality_first" => StrategyKind::QualityFirst,
            "balanced" => StrategyKind::Balanced,
            other => {
                tracing::debug!(strategy = other, "unknown strategy name, using balanced");
                StrategyKind::Balanced
            }
        }
    }
}

impl Default for StrategyKind {
    fn default() -> Self {
        StrategyKind::Balanced
    }
}

/// Informational difficulty tier of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelTier {
    General,
    Medium,
    Hard,
}

/// Latency tier with its ranking weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LatencyTier {
    Fast,
    Medium,
    Slow,
}

impl LatencyTier {
    /// Ranking weight: fast 3, medium 2, slow 1.
    pub fn weight(self) -> f64 {
        match self {
            LatencyTier::Fast => 3.0,
            LatencyTier::Medium => 2.0,
            LatencyTier::Slow => 1.0,
        }
    }
}

/// Per-category quality scores in 0..=10.
///
/// Stored as an array indexed by category declaration order; the constructor
/// takes all five values so totality holds by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityScores([u8; 5]);

impl QualityScores {
    pub const fn new(simple: u8, code: u8, reasoning: u8, data_analysis: u8, creative: u8) -> Self {
        Self([simple, code, reasoning, data_analysis, creative])
    }

    /// Quality score for one category.
    pub fn get(&self, category: TaskCategory) -> u8 {
        self.0[category.index()]
    }

    /// True when every score is within 0..=10.
    pub fn in_range(&self) -> bool {
        self.0.iter().all(|score| *score <= 10)
    }
}

/// Static profile of one model within a provider's catalogue.
///
/// Immutable once registered. `id` is the wire identifier the provider
/// expects; costs are USD per one million tokens.
#[derive(Debug, Clone)]
pub struct ModelProfile {
    pub id: String,
    pub display_name: String,
    pub tier: ModelTier,
    pub cost_per_1m_input: f64,
    pub cost_per_1m_output: f64,
    pub context_window: u32,
    /// Informational tags; ranking uses `quality`, never `strengths`.
    pub strengths: Vec<TaskCategory>,
    /// False means the model may never serve internal or sensitive prompts.
    pub supports_sensitive: bool,
    pub latency_tier: LatencyTier,
    pub quality: QualityScores,
}

impl ModelProfile {
    /// Create a profile with neutral defaults; refine with the `with_*` builders.
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            tier: ModelTier::General,
            cost_per_1m_input: 0.0,
            cost_per_1m_output: 0.0,
            context_window: 8192,
            strengths: Vec::new(),
            supports_sensitive: false,
            latency_tier: LatencyTier::Medium,
            quality: QualityScores::new(5, 5, 5, 5, 5),
        }
    }

    pub fn with_tier(mut self, tier: ModelTier) -> Self {
        self.tier = tier;
        self
    }

    pub fn with_pricing(mut self, cost_per_1m_input: f64, cost_per_1m_output: f64) -> Self {
        self.cost_per_1m_input = cost_per_1m_input;
        self.cost_per_1m_output = cost_per_1m_output;
        self
    }

    pub fn with_context_window(mut self, context_window: u32) -> Self {
        self.context_window = context_window;
        self
    }

    pub fn with_strengths(mut self, strengths: Vec<TaskCategory>) -> Self {
        self.strengths = strengths;
        self
    }

    pub fn with_sensitive_support(mut self) -> Self {
        self.supports_sensitive = true;
        self
    }

    pub fn with_latency_tier(mut self, latency_tier: LatencyTier) -> Self {
        self.latency_tier = latency_tier;
        self
    }

    pub fn with_quality(mut self, quality: QualityScores) -> Self {
        self.quality = quality;
        self
    }

    /// Estimated USD cost for one completion.
    pub fn estimate_cost(&self, input_tokens: u32, output_tokens: u32) -> f64 {
        (input_tokens as f64 / 1_000_000.0) * self.cost_per_1m_input
            + (output_tokens as f64 / 1_000_000.0) * self.cost_per_1m_output
    }

    /// Check the profile invariants: non-negative costs, positive context
    /// window, quality scores within range.
    pub fn validate(&self) -> Result<(), String> {
        if self.id.is_empty() {
            return Err("model id must not be empty".into());
        }
        if self.cost_per_1m_input < 0.0 || self.cost_per_1m_output < 0.0 {
            return Err(format!("model '{}' has negative costs", self.id));
        }
        if self.context_window == 0 {
            return Err(format!("model '{}' has a zero context window", self.id));
        }
        if !self.quality.in_range() {
            return Err(format!("model '{}' has quality scores above 10", self.id));
        }
        Ok(())
    }
}

/// Shared candidate filter, identical across providers.
///
/// Keeps a model iff all three clauses hold: restricted sensitivity implies
/// sensitive support; the context window covers the requirement; the input
/// cost is within the cap when one is set.
pub fn filter_candidates(
    models: &[ModelProfile],
    sensitivity: PrivacySensitivity,
    min_context_window: u32,
    max_cost_per_1m: Option<f64>,
) -> Vec<ModelProfile> {
    models
        .iter()
        .filter(|model| {
            if sensitivity.is_restricted() && !model.supports_sensitive {
                return false;
            }
            if model.context_window < min_context_window {
                return false;
            }
            if let Some(cap) = max_cost_per_1m {
                if model.cost_per_1m_input > cap {
                    return false;
                }
            }
            true
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(id: &str) -> ModelProfile {
        ModelProfile::new(id, id)
            .with_pricing(1.0, 2.0)
            .with_context_window(32_000)
    }

    #[test]
    fn category_order_is_stable() {
        let names: Vec<&str> = TaskCategory::ALL.iter().map(|c| c.as_str()).collect();
        assert_eq!(
            names,
            vec!["simple", "code", "reasoning", "data_analysis", "creative"]
        );
        for (idx, category) in TaskCategory::ALL.iter().enumerate() {
            assert_eq!(category.index(), idx);
            assert_eq!(TaskCategory::parse(category.as_str()), Some(*category));
        }
        assert_eq!(TaskCategory::parse("poetry"), None);
    }

    #[test]
    fn internal_and_sensitive_are_both_restricted() {
        assert!(!PrivacySensitivity::Public.is_restricted());
        assert!(PrivacySensitivity::Internal.is_restricted());
        assert!(PrivacySensitivity::Sensitive.is_restricted());
    }

    #[test]
    fn unknown_strategy_falls_back_to_balanced() {
        assert_eq!(StrategyKind::parse("cost_first"), StrategyKind::CostFirst);
        assert_eq!(
            StrategyKind::parse("quality_first"),
            StrategyKind::QualityFirst
        );
        assert_eq!(StrategyKind::parse("turbo"), StrategyKind::Balanced);
    }

    #[test]
    fn quality_scores_are_total() {
        let scores = QualityScores::new(1, 2, 3, 4, 5);
        assert_eq!(scores.get(TaskCategory::Simple), 1);
        assert_eq!(scores.get(TaskCategory::Code), 2);
        assert_eq!(scores.get(TaskCategory::Reasoning), 3);
        assert_eq!(scores.get(TaskCategory::DataAnalysis), 4);
        assert_eq!(scores.get(TaskCategory::Creative), 5);
    }

    #[test]
    fn estimate_cost_scales_per_million() {
        let m = model("m").with_pricing(2.0, 6.0);
        let cost = m.estimate_cost(500, 100);
        assert!((cost - 0.0016).abs() < 1e-6);
    }

    #[test]
    fn filter_rejects_unsupported_sensitive_models() {
        let open = model("open");
        let trusted = model("trusted").with_sensitive_support();
        let models = vec![open, trusted];

        let public = filter_candidates(&models, PrivacySensitivity::Public, 0, None);
        assert_eq!(public.len(), 2);

        for sensitivity in [PrivacySensitivity::Internal, PrivacySensitivity::Sensitive] {
            let kept = filter_candidates(&models, sensitivity, 0, None);
            assert_eq!(kept.len(), 1);
            assert_eq!(kept[0].id, "trusted");
        }
    }

    #[test]
    fn filter_context_window_boundary_is_inclusive() {
        let models = vec![model("m")];
        assert_eq!(
            filter_candidates(&models, PrivacySensitivity::Public, 32_000, None).len(),
            1
        );
        assert!(filter_candidates(&models, PrivacySensitivity::Public, 32_001, None).is_empty());
    }

    #[test]
    fn filter_cost_cap_boundary_is_inclusive() {
        let models = vec![model("m")];
        assert_eq!(
            filter_candidates(&models, PrivacySensitivity::Public, 0, Some(1.0)).len(),
            1
        );
        assert!(filter_candidates(&models, PrivacySensitivity::Public, 0, Some(0.99)).is_empty());
        assert_eq!(
            filter_candidates(&models, PrivacySensitivity::Public, 0, None).len(),
            1
        );
    }

    #[test]
    fn filter_empty_input_yields_empty_output() {
        assert!(filter_candidates(&[], PrivacySensitivity::Public, 0, None).is_empty());
    }

    #[test]
    fn validate_rejects_broken_profiles() {
        assert!(model("ok").validate().is_ok());
        assert!(model("m").with_pricing(-0.1, 1.0).validate().is_err());
        assert!(model("m").with_context_window(0).validate().is_err());
        assert!(model("m")
            .with_quality(QualityScores::new(11, 0, 0, 0, 0))
            .validate()
            .is_err());
    }
}
