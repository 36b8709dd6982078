//! Vector store abstraction over the labelled example collection.

pub mod qdrant;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::TaskCategory;

pub use self::qdrant::QdrantStore;

/// Name of the collection holding labelled classification examples.
pub const COLLECTION_NAME: &str = "llm_router_examples";

/// Errors from the vector store.
#[derive(Debug, Error)]
pub enum VectorStoreError {
    #[error("vector store connection failed: {0}")]
    Connection(String),

    #[error("vector store operation failed: {0}")]
    Operation(String),
}

/// Payload stored with every labelled example point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamplePayload {
    pub category: TaskCategory,
    pub text: String,
    /// Origin of the example, e.g. `seed` or `feedback`.
    pub source: String,
    #[serde(rename = "addedAt")]
    pub added_at: DateTime<Utc>,
}

/// One nearest-neighbour hit: the labelled category plus its similarity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchHit {
    pub category: TaskCategory,
    pub score: f32,
}

/// KNN search and upsert over one named collection.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Return up to `limit` nearest neighbours of `vector`, most similar
    /// first, in store order.
    async fn search(&self, vector: Vec<f32>, limit: u64) -> Result<Vec<SearchHit>, VectorStoreError>;

    /// Insert one labelled example.
    async fn upsert(&self, vector: Vec<f32>, payload: ExamplePayload) -> Result<(), VectorStoreError>;

    /// Create the collection if it does not exist.
    async fn ensure_collection(&self, dimension: u64) -> Result<(), VectorStoreError>;
}
