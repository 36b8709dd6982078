//! Production embedding runtime backed by fastembed ONNX models.
//!
//! Model inference is CPU-bound and the fastembed handle needs exclusive
//! access, so calls are funnelled through `spawn_blocking` with the handle
//! behind a mutex. Construction performs a warmup embed and records the
//! output dimension.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use tracing::{info, warn};

use super::{EmbeddingError, EmbeddingRuntime};

/// Default model: 384-dimension MiniLM, small enough to warm quickly.
const DEFAULT_MODEL_NAME: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Embedding runtime over a local fastembed model.
pub struct FastembedRuntime {
    model: Arc<Mutex<TextEmbedding>>,
    model_name: String,
    dimension: usize,
}

impl FastembedRuntime {
    /// Load and warm the model.
    ///
    /// `model_name` is a Hugging Face model name; names outside the supported
    /// set fall back to the default with a warning. `cache_dir` overrides
    /// where model files are stored.
    pub async fn load(
        model_name: Option<&str>,
        cache_dir: Option<&Path>,
    ) -> Result<Self, EmbeddingError> {
        let (model_id, resolved_name) = resolve_model(model_name);
        let mut options = InitOptions::new(model_id).with_show_download_progress(false);
        if let Some(dir) = cache_dir {
            options = options.with_cache_dir(PathBuf::from(dir));
        }

        let embedding = tokio::task::spawn_blocking(move || TextEmbedding::try_new(options))
            .await
            .map_err(|e| EmbeddingError::ModelLoad(e.to_string()))?
            .map_err(|e| EmbeddingError::ModelLoad(e.to_string()))?;

        let model = Arc::new(Mutex::new(embedding));
        let warmup = embed_blocking(Arc::clone(&model), "warmup".to_string()).await?;
        let dimension = warmup.len();
        info!(model = %resolved_name, dimension, "embedding runtime warmed");

        Ok(Self {
            model,
            model_name: resolved_name,
            dimension,
        })
    }

    /// Name of the loaded model.
    pub fn model_name(&self) -> &str {
        &self.model_name
    }
}

#[async_trait]
impl EmbeddingRuntime for FastembedRuntime {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        embed_blocking(Arc::clone(&self.model), text.to_string()).await
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

async fn embed_blocking(
    model: Arc<Mutex<TextEmbedding>>,
    text: String,
) -> Result<Vec<f32>, EmbeddingError> {
    let mut vectors = tokio::task::spawn_blocking(move || {
        let mut guard = model.lock().expect("embedding model poisoned");
        guard.embed(vec![text], None)
    })
    .await
    .map_err(|e| EmbeddingError::Inference(e.to_string()))?
    .map_err(|e| EmbeddingError::Inference(e.to_string()))?;

    vectors
        .pop()
        .ok_or_else(|| EmbeddingError::Inference("model returned no vectors".into()))
}

/// Map a Hugging Face model name onto a supported fastembed model.
fn resolve_model(name: Option<&str>) -> (EmbeddingModel, String) {
    let requested = name.unwrap_or(DEFAULT_MODEL_NAME);
    let model = match requested {
        "sentence-transformers/all-MiniLM-L6-v2" => EmbeddingModel::AllMiniLML6V2,
        "sentence-transformers/all-MiniLM-L12-v2" => EmbeddingModel::AllMiniLML12V2,
        "BAAI/bge-small-en-v1.5" => EmbeddingModel::BGESmallENV15,
        "BAAI/bge-base-en-v1.5" => EmbeddingModel::BGEBaseENV15,
        "nomic-ai/nomic-embed-text-v1.5" => EmbeddingModel::NomicEmbedTextV15,
        other => {
            warn!(
                model = other,
                fallback = DEFAULT_MODEL_NAME,
                "unsupported embedding model name, using fallback"
            );
            return (EmbeddingModel::AllMiniLML6V2, DEFAULT_MODEL_NAME.to_string());
        }
    };
    (model, requested.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_model_names_resolve() {
        let (_, name) = resolve_model(Some("BAAI/bge-small-en-v1.5"));
        assert_eq!(name, "BAAI/bge-small-en-v1.5");
    }

    #[test]
    fn unknown_model_names_fall_back_to_default() {
        let (_, name) = resolve_model(Some("acme/embedder-9000"));
        assert_eq!(name, DEFAULT_MODEL_NAME);
        let (_, name) = resolve_model(None);
        assert_eq!(name, DEFAULT_MODEL_NAME);
    }
}
