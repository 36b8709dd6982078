//! Qdrant adapter for the labelled example collection.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use qdrant_client::qdrant::value::Kind;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, PointStruct, ScoredPoint, SearchPointsBuilder,
    UpsertPointsBuilder, VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant};
use tracing::{info, warn};

use crate::catalog::TaskCategory;

use super::{ExamplePayload, SearchHit, VectorStore, VectorStoreError, COLLECTION_NAME};

/// Qdrant-backed vector store.
pub struct QdrantStore {
    client: Qdrant,
    collection: String,
    /// Point ids are monotonic per process; seeded from the clock so
    /// restarts do not collide with earlier inserts.
    next_point_id: AtomicU64,
}

impl QdrantStore {
    /// Connect to a Qdrant instance at `url` (gRPC endpoint).
    pub fn connect(url: &str) -> Result<Self, VectorStoreError> {
        let client = Qdrant::from_url(url)
            .build()
            .map_err(|e| VectorStoreError::Connection(e.to_string()))?;
        Ok(Self {
            client,
            collection: COLLECTION_NAME.to_string(),
            next_point_id: AtomicU64::new(Utc::now().timestamp_micros().max(0) as u64),
        })
    }

    fn hit_from_point(point: &ScoredPoint) -> Option<SearchHit> {
        let category = match point.payload.get("category").and_then(|v| match &v.kind {
            Some(Kind::StringValue(s)) => Some(s.as_str()),
            _ => None,
        }) {
            Some(name) => TaskCategory::parse(name),
            None => None,
        };
        match category {
            Some(category) => Some(SearchHit {
                category,
                score: point.score,
            }),
            None => {
                warn!(point = ?point.id, "skipping hit without a parseable category payload");
                None
            }
        }
    }
}

#[async_trait]
impl VectorStore for QdrantStore {
    async fn search(
        &self,
        vector: Vec<f32>,
        limit: u64,
    ) -> Result<Vec<SearchHit>, VectorStoreError> {
        let response = self
            .client
            .search_points(
                SearchPointsBuilder::new(&self.collection, vector, limit).with_payload(true),
            )
            .await
            .map_err(|e| VectorStoreError::Operation(e.to_string()))?;

        Ok(response
            .result
            .iter()
            .filter_map(Self::hit_from_point)
            .collect())
    }

    async fn upsert(
        &self,
        vector: Vec<f32>,
        payload: ExamplePayload,
    ) -> Result<(), VectorStoreError> {
        let json = serde_json::to_value(&payload)
            .map_err(|e| VectorStoreError::Operation(e.to_string()))?;
        let payload = Payload::try_from(json)
            .map_err(|e| VectorStoreError::Operation(e.to_string()))?;

        let id = self.next_point_id.fetch_add(1, Ordering::SeqCst);
        let point = PointStruct::new(id, vector, payload);
        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, vec![point]))
            .await
            .map_err(|e| VectorStoreError::Operation(e.to_string()))?;
        Ok(())
    }

    async fn ensure_collection(&self, dimension: u64) -> Result<(), VectorStoreError> {
        let exists = self
            .client
            .collection_exists(&self.collection)
            .await
            .map_err(|e| VectorStoreError::Operation(e.to_string()))?;
        if exists {
            return Ok(());
        }
        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection)
                    .vectors_config(VectorParamsBuilder::new(dimension, Distance::Cosine)),
            )
            .await
            .map_err(|e| VectorStoreError::Operation(e.to_string()))?;
        info!(collection = %self.collection, dimension, "created vector collection");
        Ok(())
    }
}
