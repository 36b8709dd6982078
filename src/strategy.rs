//! Routing strategies: rank filtered candidates for one request.
//!
//! Every strategy computes a scalar score per candidate and returns a copy of
//! the input sorted in descending score. The sort is stable, so ties keep
//! input order, and the input list is never mutated.

use crate::catalog::{ModelProfile, StrategyKind, TaskCategory};

/// Weights applied to the quality, cost, and latency components.
#[derive(Debug, Clone, Copy)]
struct Weights {
    quality: f64,
    cost: f64,
    latency: f64,
}

const COST_FIRST: Weights = Weights {
    quality: 0.2,
    cost: 0.7,
    latency: 0.1,
};
const QUALITY_FIRST: Weights = Weights {
    quality: 0.8,
    cost: 0.1,
    latency: 0.1,
};
const BALANCED: Weights = Weights {
    quality: 0.5,
    cost: 0.3,
    latency: 0.2,
};

/// A ranking strategy over candidate models.
pub trait RouteStrategy: Send + Sync {
    /// Return a copy of `candidates` sorted by descending score for the
    /// inferred category. Ties preserve input order.
    fn select(&self, candidates: &[ModelProfile], category: TaskCategory) -> Vec<ModelProfile>;

    /// Strategy name for logging.
    fn name(&self) -> &'static str;
}

/// Spend as little as possible while keeping some quality signal.
pub struct CostFirst;

/// Maximise per-category quality; cost barely matters.
pub struct QualityFirst;

/// Default compromise between quality, cost, and latency.
pub struct Balanced;

impl RouteStrategy for CostFirst {
    fn select(&self, candidates: &[ModelProfile], category: TaskCategory) -> Vec<ModelProfile> {
        rank(candidates, category, COST_FIRST)
    }

    fn name(&self) -> &'static str {
        "cost_first"
    }
}

impl RouteStrategy for QualityFirst {
    fn select(&self, candidates: &[ModelProfile], category: TaskCategory) -> Vec<ModelProfile> {
        rank(candidates, category, QUALITY_FIRST)
    }

    fn name(&self) -> &'static str {
        "quality_first"
    }
}

impl RouteStrategy for Balanced {
    fn select(&self, candidates: &[ModelProfile], category: TaskCategory) -> Vec<ModelProfile> {
        rank(candidates, category, BALANCED)
    }

    fn name(&self) -> &'static str {
        "balanced"
    }
}

/// Strategy factory. [`StrategyKind::parse`] already maps unknown names to
/// `balanced`, so this is total.
pub fn strategy_for(kind: StrategyKind) -> Box<dyn RouteStrategy> {
    match kind {
        StrategyKind::CostFirst => Box::new(CostFirst),
        StrategyKind::QualityFirst => Box::new(QualityFirst),
        StrategyKind::Balanced => Box::new(Balanced),
    }
}

fn rank(candidates: &[ModelProfile], category: TaskCategory, weights: Weights) -> Vec<ModelProfile> {
    let mut scored: Vec<(f64, ModelProfile)> = candidates
        .iter()
        .map(|model| (score(model, category, weights), model.clone()))
        .collect();
    // Stable sort: equal scores keep input order.
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    scored.into_iter().map(|(_, model)| model).collect()
}

fn score(model: &ModelProfile, category: TaskCategory, weights: Weights) -> f64 {
    let quality = model.quality.get(category) as f64;
    let cost_score = 10.0 - (model.cost_per_1m_input * 5.0).min(10.0);
    let latency_score = model.latency_tier.weight();
    weights.quality * quality + weights.cost * cost_score + weights.latency * latency_score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{LatencyTier, QualityScores};

    fn model(id: &str, cost_in: f64, code_quality: u8, latency: LatencyTier) -> ModelProfile {
        ModelProfile::new(id, id)
            .with_pricing(cost_in, cost_in * 2.0)
            .with_latency_tier(latency)
            .with_quality(QualityScores::new(5, code_quality, 5, 5, 5))
    }

    fn ids(models: &[ModelProfile]) -> Vec<&str> {
        models.iter().map(|m| m.id.as_str()).collect()
    }

    #[test]
    fn cost_score_clamps_into_range() {
        let cheap = model("cheap", 0.0, 5, LatencyTier::Medium);
        let pricey = model("pricey", 50.0, 5, LatencyTier::Medium);
        // cost_score is 10 for free models and 0 once cost*5 >= 10.
        let w = Weights {
            quality: 0.0,
            cost: 1.0,
            latency: 0.0,
        };
        assert!((score(&cheap, TaskCategory::Code, w) - 10.0).abs() < 1e-9);
        assert!(score(&pricey, TaskCategory::Code, w).abs() < 1e-9);
    }

    #[test]
    fn quality_first_prefers_the_strong_model() {
        let models = vec![
            model("cheap-weak", 0.1, 3, LatencyTier::Fast),
            model("pricey-strong", 5.0, 10, LatencyTier::Slow),
        ];
        let ranked = QualityFirst.select(&models, TaskCategory::Code);
        assert_eq!(ids(&ranked), vec!["pricey-strong", "cheap-weak"]);
    }

    #[test]
    fn cost_first_prefers_the_cheap_model() {
        let models = vec![
            model("pricey-strong", 5.0, 10, LatencyTier::Slow),
            model("cheap-weak", 0.1, 3, LatencyTier::Fast),
        ];
        let ranked = CostFirst.select(&models, TaskCategory::Code);
        assert_eq!(ids(&ranked), vec!["cheap-weak", "pricey-strong"]);
    }

    #[test]
    fn select_returns_a_permutation_and_leaves_input_untouched() {
        let models = vec![
            model("a", 1.0, 7, LatencyTier::Fast),
            model("b", 0.5, 4, LatencyTier::Slow),
            model("c", 2.0, 9, LatencyTier::Medium),
        ];
        let before = ids(&models);
        for kind in [
            StrategyKind::CostFirst,
            StrategyKind::QualityFirst,
            StrategyKind::Balanced,
        ] {
            let ranked = strategy_for(kind).select(&models, TaskCategory::Code);
            assert_eq!(ranked.len(), models.len());
            let mut ranked_ids = ids(&ranked);
            ranked_ids.sort_unstable();
            let mut input_ids = before.clone();
            input_ids.sort_unstable();
            assert_eq!(ranked_ids, input_ids);
        }
        assert_eq!(ids(&models), before);
    }

    #[test]
    fn ties_preserve_input_order() {
        let twin_a = model("twin-a", 1.0, 6, LatencyTier::Medium);
        let twin_b = model("twin-b", 1.0, 6, LatencyTier::Medium);
        let models = vec![twin_a, twin_b];
        let ranked = Balanced.select(&models, TaskCategory::Code);
        assert_eq!(ids(&ranked), vec!["twin-a", "twin-b"]);

        let reversed: Vec<ModelProfile> = models.iter().rev().cloned().collect();
        let ranked = Balanced.select(&reversed, TaskCategory::Code);
        assert_eq!(ids(&ranked), vec!["twin-b", "twin-a"]);
    }

    #[test]
    fn scores_are_non_increasing() {
        let models = vec![
            model("a", 0.2, 9, LatencyTier::Fast),
            model("b", 3.0, 2, LatencyTier::Slow),
            model("c", 1.0, 6, LatencyTier::Medium),
            model("d", 0.0, 4, LatencyTier::Fast),
        ];
        for (kind, weights) in [
            (StrategyKind::CostFirst, COST_FIRST),
            (StrategyKind::QualityFirst, QUALITY_FIRST),
            (StrategyKind::Balanced, BALANCED),
        ] {
            let ranked = strategy_for(kind).select(&models, TaskCategory::Code);
            let scores: Vec<f64> = ranked
                .iter()
                .map(|m| score(m, TaskCategory::Code, weights))
                .collect();
            for pair in scores.windows(2) {
                assert!(pair[0] >= pair[1]);
            }
        }
    }
}
