//! HTTP routes and handlers

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, warn};
use veracity_classifiers::Detection;
use veracity_core::Error;

use crate::config::ServerConfig;
use crate::state::AppState;
use crate::telemetry::{DECISIONS_TOTAL, ERRORS_TOTAL, INFERENCE_LATENCY_US, REQUESTS_TOTAL};

pub fn create_router(state: AppState, config: &ServerConfig) -> Router {
    let router = Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/v1/classify", post(classify))
        .fallback(fallback)
        .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if config.cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

async fn health_check() -> &'static str {
    "OK"
}

async fn metrics(State(state): State<AppState>) -> String {
    state.metrics_handle.render()
}

/// Classification request body
#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    pub text: String,
}

async fn classify(
    State(state): State<AppState>,
    Json(req): Json<ClassifyRequest>,
) -> Result<Json<Detection>, AppError> {
    metrics::counter!(REQUESTS_TOTAL).increment(1);
    debug!("Received classify request ({} bytes)", req.text.len());

    let detector = state.detector.clone();
    let detection = tokio::task::spawn_blocking(move || detector.detect(&req.text))
        .await
        .map_err(|e| AppError::Internal(format!("inference task failed: {}", e)))??;

    let label = detection.decision.label();
    metrics::counter!(DECISIONS_TOTAL, "label" => label.as_str()).increment(1);
    metrics::histogram!(INFERENCE_LATENCY_US).record(detection.latency_us as f64);

    Ok(Json(detection))
}

async fn fallback() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": {
                "message": "Not found",
                "type": "not_found",
            }
        })),
    )
}

/// Handler errors, rendered as `{"error": {"message", "type"}}`
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Blank text, nothing to classify
    #[error("{0}")]
    EmptyInput(String),
    /// Classifier failed or broke its output contract
    #[error("inference failed: {0}")]
    Inference(String),
    /// Artifacts are not usable
    #[error("model unavailable: {0}")]
    Unavailable(String),
    /// Anything else
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn kind(&self) -> &'static str {
        match self {
            AppError::EmptyInput(_) => "empty_input",
            AppError::Inference(_) => "inference_error",
            AppError::Unavailable(_) => "model_unavailable",
            AppError::Internal(_) => "internal_error",
        }
    }
}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        match err {
            Error::EmptyInput => AppError::EmptyInput(err.to_string()),
            Error::InferenceContract(_) | Error::Inference(_) => {
                AppError::Inference(err.to_string())
            }
            Error::StartupLoad { .. } => AppError::Unavailable(err.to_string()),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        metrics::counter!(ERRORS_TOTAL, "type" => kind).increment(1);

        let (status, message) = match self {
            AppError::EmptyInput(msg) => {
                debug!("Rejected blank input");
                (StatusCode::UNPROCESSABLE_ENTITY, msg)
            }
            AppError::Inference(msg) => {
                error!("Inference failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            AppError::Unavailable(msg) => {
                warn!("Model unavailable: {}", msg);
                (StatusCode::SERVICE_UNAVAILABLE, msg)
            }
            AppError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = json!({
            "error": {
                "message": message,
                "type": kind,
            }
        });

        (status, Json(body)).into_response()
    }
}
