//! Semantic prompt-routing engine for multi-provider LLM completions.
//!
//! A client submits a natural-language prompt plus routing preferences; the
//! engine classifies the prompt with an embedding-backed nearest-neighbour
//! classifier, ranks candidate models by cost/quality/latency, and drives the
//! completion through a per-model circuit breaker, retry-with-backoff, and an
//! ordered fallback chain. Every successful completion is audited
//! asynchronously.

pub mod app;
pub mod audit;
pub mod breaker;
pub mod cache;
pub mod catalog;
pub mod classifier;
pub mod config;
pub mod embedding;
pub mod error;
pub mod metrics;
pub mod providers;
pub mod retry;
pub mod router;
pub mod server;
pub mod strategy;
pub mod vector;

// Re-export the types most callers need.
pub use catalog::{
    LatencyTier, ModelProfile, ModelTier, PrivacySensitivity, QualityScores, StrategyKind,
    TaskCategory,
};
pub use classifier::{ClassificationResult, ClassificationSource, Classifier, SemanticClassifier};
pub use error::{LlmError, RouterError};
pub use router::{LlmResponse, RouterEngine, RoutingOptions, TokenUsage};
