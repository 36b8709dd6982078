//! Semantic prompt classifier: cache, embed, two-pass KNN vote.
//!
//! Pass one asks for a small neighbourhood with linear similarity weighting.
//! When that vote is not confident enough, a wider neighbourhood is scored
//! with cubic weighting, which sharpens the contribution of close matches;
//! the wider result replaces the first only when strictly better. Confident
//! results are cached for a day; uncertain results are never cached.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::cache::{CacheError, ClassificationCache};
use crate::catalog::TaskCategory;
use crate::embedding::{estimate_tokens, fingerprint, EmbeddingError, EmbeddingRuntime};
use crate::metrics;
use crate::vector::{ExamplePayload, SearchHit, VectorStore, VectorStoreError};

/// Results at or above this confidence are cached; below it, a second
/// wider KNN pass runs.
pub const CACHE_CONFIDENCE_THRESHOLD: f64 = 0.75;

/// Cache TTL for confident classifications.
pub const CACHE_TTL_SECS: u64 = 86_400;

const FIRST_PASS_K: u64 = 7;
const SECOND_PASS_K: u64 = 20;

/// Errors fatal to one classification request.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("vector store failed: {0}")]
    Store(#[from] VectorStoreError),

    #[error("classification cache failed: {0}")]
    Cache(#[from] CacheError),
}

/// Where a classification came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassificationSource {
    Cache,
    Semantic,
    /// Reserved for an external classifier; never produced here.
    Llm,
}

impl ClassificationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassificationSource::Cache => "cache",
            ClassificationSource::Semantic => "semantic",
            ClassificationSource::Llm => "llm",
        }
    }
}

impl fmt::Display for ClassificationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of classifying one prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub category: TaskCategory,
    /// Normalised share of the winning category, in [0, 1].
    pub confidence: f64,
    /// Normalised share per category; sums to 1 when any hit was found.
    pub scores: BTreeMap<TaskCategory, f64>,
    /// Neighbour list in store order, formatted `<category>(<score2dp>)`.
    /// Debug aid only, never used for logic.
    pub signals: Vec<String>,
    pub estimated_input_tokens: u32,
    pub source: ClassificationSource,
}

/// Classifier capability consumed by the router.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, prompt: &str) -> Result<ClassificationResult, ClassifierError>;

    async fn add_example(
        &self,
        text: &str,
        category: TaskCategory,
    ) -> Result<(), ClassifierError>;

    async fn ensure_collection(&self) -> Result<(), ClassifierError>;
}

/// Cache key for a prompt: `llm:cls:` plus the prompt fingerprint in hex.
pub fn cache_key(prompt: &str) -> String {
    format!("llm:cls:{:x}", fingerprint(prompt))
}

/// Nearest-neighbour classifier over the labelled example collection.
pub struct SemanticClassifier {
    embedding: Arc<dyn EmbeddingRuntime>,
    store: Arc<dyn VectorStore>,
    cache: Arc<dyn ClassificationCache>,
}

impl SemanticClassifier {
    pub fn new(
        embedding: Arc<dyn EmbeddingRuntime>,
        store: Arc<dyn VectorStore>,
        cache: Arc<dyn ClassificationCache>,
    ) -> Self {
        Self {
            embedding,
            store,
            cache,
        }
    }

    async fn run_pass(
        &self,
        prompt: &str,
        vector: &[f32],
        k: u64,
        weight: fn(f32) -> f64,
    ) -> Result<ClassificationResult, ClassifierError> {
        let hits = self.store.search(vector.to_vec(), k).await?;
        let (scores, category, confidence) = score_hits(&hits, weight);
        Ok(ClassificationResult {
            category,
            confidence,
            scores,
            signals: hits
                .iter()
                .map(|hit| format!("{}({:.2})", hit.category, hit.score))
                .collect(),
            estimated_input_tokens: estimate_tokens(prompt),
            source: ClassificationSource::Semantic,
        })
    }

    /// Best-effort cache write: SET, then EXPIRE. A failure of either step
    /// is logged and swallowed; classification already succeeded.
    async fn write_cache(&self, key: &str, result: &ClassificationResult) {
        let value = match serde_json::to_string(result) {
            Ok(value) => value,
            Err(err) => {
                warn!(%err, "failed to serialise classification for caching");
                return;
            }
        };
        if let Err(err) = self.cache.set(key, &value).await {
            warn!(%err, "classification cache write failed");
            return;
        }
        if let Err(err) = self.cache.expire(key, CACHE_TTL_SECS).await {
            warn!(%err, "classification cache TTL set failed");
        }
    }
}

#[async_trait]
impl Classifier for SemanticClassifier {
    async fn classify(&self, prompt: &str) -> Result<ClassificationResult, ClassifierError> {
        let key = cache_key(prompt);
        if let Some(raw) = self.cache.get(&key).await? {
            match serde_json::from_str::<ClassificationResult>(&raw) {
                Ok(mut cached) => {
                    cached.source = ClassificationSource::Cache;
                    metrics::classification_cache_hit();
                    return Ok(cached);
                }
                // A corrupt entry behaves as a miss and gets overwritten.
                Err(err) => warn!(%err, "ignoring unparseable cached classification"),
            }
        }

        let vector = self.embedding.embed(prompt).await?;

        let mut result = self
            .run_pass(prompt, &vector, FIRST_PASS_K, linear_weight)
            .await?;
        if result.confidence < CACHE_CONFIDENCE_THRESHOLD {
            let second = self
                .run_pass(prompt, &vector, SECOND_PASS_K, cubic_weight)
                .await?;
            if second.confidence > result.confidence {
                result = second;
            }
        }

        if result.confidence >= CACHE_CONFIDENCE_THRESHOLD {
            self.write_cache(&key, &result).await;
        }
        Ok(result)
    }

    async fn add_example(
        &self,
        text: &str,
        category: TaskCategory,
    ) -> Result<(), ClassifierError> {
        let vector = self.embedding.embed(text).await?;
        self.store
            .upsert(
                vector,
                ExamplePayload {
                    category,
                    text: text.to_string(),
                    source: "feedback".to_string(),
                    added_at: Utc::now(),
                },
            )
            .await?;
        Ok(())
    }

    async fn ensure_collection(&self) -> Result<(), ClassifierError> {
        self.store
            .ensure_collection(self.embedding.dimension() as u64)
            .await?;
        Ok(())
    }
}

fn linear_weight(score: f32) -> f64 {
    score as f64
}

fn cubic_weight(score: f32) -> f64 {
    (score as f64).powi(3)
}

/// Accumulate weighted votes per category and normalise.
///
/// The winner is the maximum normalised share; exact ties resolve to the
/// first category in declaration order, which keeps behaviour deterministic.
fn score_hits(
    hits: &[SearchHit],
    weight: fn(f32) -> f64,
) -> (BTreeMap<TaskCategory, f64>, TaskCategory, f64) {
    let mut totals = [0.0f64; 5];
    for hit in hits {
        totals[hit.category.index()] += weight(hit.score);
    }
    let sum: f64 = totals.iter().sum();
    let norm = if sum == 0.0 { 1.0 } else { sum };

    let mut scores = BTreeMap::new();
    for category in TaskCategory::ALL {
        scores.insert(category, totals[category.index()] / norm);
    }

    let mut winner = TaskCategory::ALL[0];
    let mut best = scores[&winner];
    for category in TaskCategory::ALL {
        let share = scores[&category];
        if share > best {
            winner = category;
            best = share;
        }
    }
    (scores, winner, best)
}
