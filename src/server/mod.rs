//! HTTP surface: `/complete`, `/feedback`, `/health`, `/metrics`.
//!
//! Validation failures answer 400, orchestrator failures 500; both carry a
//! `{error, code}` JSON body. Unknown strategy names are tolerated (they fall
//! back to balanced), unknown sensitivities and categories are rejected by
//! deserialisation.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::catalog::{PrivacySensitivity, StrategyKind, TaskCategory};
use crate::error::RouterError;
use crate::metrics;
use crate::router::{RouterEngine, RoutingOptions};

/// Shared state for all handlers.
pub struct AppState {
    pub engine: Arc<RouterEngine>,
    /// Embedding model name, reported by `/health`.
    pub embedding_model: String,
}

/// Build the axum router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/complete", post(complete))
        .route("/feedback", post(feedback))
        .route("/health", get(health))
        .route("/metrics", get(export_metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until the process exits.
pub async fn serve(state: Arc<AppState>, port: u16) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!(port, "listening");
    axum::serve(listener, build_router(state)).await
}

#[derive(Debug, Deserialize)]
struct CompleteRequest {
    prompt: String,
    #[serde(default)]
    options: Option<CompleteOptions>,
}

/// Wire form of [`RoutingOptions`]; absent fields take the engine defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct CompleteOptions {
    strategy: Option<String>,
    sensitivity: Option<PrivacySensitivity>,
    require_context_window: Option<u32>,
    // rename_all would lowercase the M in 1M.
    #[serde(rename = "maxCostPer1MTokens")]
    max_cost_per_1m_tokens: Option<f64>,
    force_category: Option<TaskCategory>,
    force_model: Option<String>,
}

impl CompleteOptions {
    fn into_routing_options(self) -> RoutingOptions {
        let defaults = RoutingOptions::default();
        RoutingOptions {
            strategy: self
                .strategy
                .as_deref()
                .map(StrategyKind::parse)
                .unwrap_or(defaults.strategy),
            sensitivity: self.sensitivity.unwrap_or(defaults.sensitivity),
            require_context_window: self.require_context_window.unwrap_or(0),
            max_cost_per_1m_tokens: self.max_cost_per_1m_tokens,
            force_category: self.force_category,
            force_model: self.force_model,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FeedbackRequest {
    prompt: String,
    correct_category: TaskCategory,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    code: String,
}

fn validation_error(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            error: message.into(),
            code: "VALIDATION".to_string(),
        }),
    )
        .into_response()
}

fn router_error(err: RouterError) -> Response {
    let code = match &err {
        RouterError::UnknownModel(_) => "UNKNOWN_MODEL",
        RouterError::NoModelsAvailable => "NO_MODELS_AVAILABLE",
        RouterError::AllModelsFailed { .. } => "ALL_MODELS_FAILED",
        RouterError::Classifier(_) => "CLASSIFIER_ERROR",
    };
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            error: err.to_string(),
            code: code.to_string(),
        }),
    )
        .into_response()
}

async fn complete(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CompleteRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(json) => json,
        Err(rejection) => return validation_error(rejection.body_text()),
    };
    if request.prompt.is_empty() {
        return validation_error("prompt must not be empty");
    }

    let opts = request
        .options
        .map(CompleteOptions::into_routing_options)
        .unwrap_or_default();
    match state.engine.complete(&request.prompt, &opts).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(err) => router_error(err),
    }
}

async fn feedback(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<FeedbackRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(json) => json,
        Err(rejection) => return validation_error(rejection.body_text()),
    };
    if request.prompt.is_empty() {
        return validation_error("prompt must not be empty");
    }

    match state
        .engine
        .feedback(&request.prompt, request.correct_category)
        .await
    {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "ok": true,
                "message": format!(
                    "example recorded for category '{}'",
                    request.correct_category
                ),
            })),
        )
            .into_response(),
        Err(err) => router_error(err),
    }
}

async fn health(State(state): State<Arc<AppState>>) -> Response {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "model": state.embedding_model,
            "ts": Utc::now().to_rfc3339(),
        })),
    )
        .into_response()
}

async fn export_metrics() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics::export(),
    )
        .into_response()
}
