//! HTTP API
//!
//! JSON endpoints around the classifier. Every response other than
//! `/health` uses the `{success, data, error}` envelope.

use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::classifier::SpamClassifier;
use crate::verdict::{Label, Verdict};

/// Shared handler state
pub struct AppState {
    pub classifier: Arc<SpamClassifier>,
}

/// API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(msg: &str) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.to_string()),
        }
    }
}

/// Message submitted for classification or normalization
#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    /// A missing field is treated like an empty message
    #[serde(default)]
    pub message: String,
}

/// Verdict response
#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    pub label: Label,
    pub is_spam: bool,
    pub headline: String,
    pub rationale: String,
}

impl From<Verdict> for ClassifyResponse {
    fn from(verdict: Verdict) -> Self {
        Self {
            label: verdict.label,
            is_spam: verdict.is_spam(),
            headline: verdict.headline().to_string(),
            rationale: verdict.rationale.to_string(),
        }
    }
}

/// Canonical form response
#[derive(Debug, Serialize)]
pub struct NormalizeResponse {
    pub canonical: String,
    pub tokens: Vec<String>,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Build the router with all routes
pub fn router(classifier: Arc<SpamClassifier>, max_body_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let state = Arc::new(AppState { classifier });

    Router::new()
        .route("/health", get(health))
        .route("/api/classify", post(classify))
        .route("/api/normalize", post(normalize))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "shield-rs",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// POST /api/classify
pub async fn classify(
    State(state): State<Arc<AppState>>,
    Json(req): Json<MessageRequest>,
) -> (StatusCode, Json<ApiResponse<ClassifyResponse>>) {
    match state.classifier.classify(&req.message) {
        Ok(verdict) => (
            StatusCode::OK,
            Json(ApiResponse::success(ClassifyResponse::from(verdict))),
        ),
        Err(e) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiResponse::error(&e.to_string())),
        ),
    }
}

/// POST /api/normalize
pub async fn normalize(
    State(state): State<Arc<AppState>>,
    Json(req): Json<MessageRequest>,
) -> (StatusCode, Json<ApiResponse<NormalizeResponse>>) {
    let canonical = state.classifier.normalize(&req.message);
    let tokens = canonical.tokens().map(str::to_string).collect();

    (
        StatusCode::OK,
        Json(ApiResponse::success(NormalizeResponse {
            canonical: canonical.into_string(),
            tokens,
        })),
    )
}
