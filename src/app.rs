//! Composition root: wire collaborators, warm up, and serve.

use std::sync::Arc;

use tracing::info;

use crate::audit::PostgresAuditSink;
use crate::cache::RedisCache;
use crate::classifier::{Classifier, SemanticClassifier};
use crate::config::AppConfig;
use crate::embedding::{EmbeddingRuntime, FastembedRuntime};
use crate::metrics;
use crate::providers::{AnthropicClient, OpenAiCompatClient, ProviderClient, ProviderKind};
use crate::router::RouterEngine;
use crate::server::{self, AppState};
use crate::vector::QdrantStore;

/// Boot the engine and serve HTTP until the process exits.
///
/// Order matters: the embedding runtime is warmed and the vector collection
/// and audit schema are ensured before the listener starts accepting
/// requests.
pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    metrics::init_metrics()?;

    let embedding = Arc::new(
        FastembedRuntime::load(
            config.hf_model_name.as_deref(),
            config.models_cache_dir.as_deref(),
        )
        .await?,
    );
    let embedding_model = embedding.model_name().to_string();

    let store = Arc::new(QdrantStore::connect(&config.qdrant_url)?);
    let cache = Arc::new(RedisCache::connect(&config.redis_url).await?);
    let classifier = Arc::new(SemanticClassifier::new(
        embedding.clone() as Arc<dyn EmbeddingRuntime>,
        store,
        cache,
    ));
    classifier.ensure_collection().await?;

    let audit = Arc::new(PostgresAuditSink::connect(&config.database_url).await?);
    audit.ensure_schema().await?;

    let provider: Arc<dyn ProviderClient> = match config.provider {
        ProviderKind::Anthropic => Arc::new(AnthropicClient::new(config.api_key.clone())),
        kind => Arc::new(OpenAiCompatClient::new(kind, config.api_key.clone())),
    };
    info!(provider = config.provider.as_str(), "provider client ready");

    let engine = Arc::new(RouterEngine::new(classifier, provider, audit));
    let state = Arc::new(AppState {
        engine,
        embedding_model,
    });

    server::serve(state, config.port).await?;
    Ok(())
}
