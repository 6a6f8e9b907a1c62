//! HTTP JSON API for seolens
//!
//! - `POST /api/analyze` with `{"url": "..."}` returns the full analysis.
//! - `GET /health` reports liveness and the crate version.

pub mod config;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{Method, StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use seolens_core::{AnalyzeError, AnalyzeResult, Analyzer};
use serde::Serialize;
use serde_json::Value as JsonValue;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[derive(Clone)]
pub struct AppState {
    pub analyzer: Analyzer,
}

/// Error body returned for every failed analysis: `{"error": "..."}` with 400
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }

    fn invalid_url() -> Self {
        Self::new(AnalyzeError::InvalidUrl.to_string())
    }
}

impl From<AnalyzeError> for ApiError {
    fn from(error: AnalyzeError) -> Self {
        match &error {
            AnalyzeError::InvalidUrl => tracing::debug!("rejected invalid URL"),
            other => tracing::warn!(error = %other, "analysis failed"),
        }
        Self::new(error.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::BAD_REQUEST, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    version: &'static str,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/analyze", post(analyze))
        .route("/health", get(health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors()),
        )
        .with_state(state)
}

/// A body that is not JSON, or lacks a string `url`, is an invalid URL.
async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<JsonValue>, JsonRejection>,
) -> Result<Json<AnalyzeResult>, ApiError> {
    let url = match payload {
        Ok(Json(body)) => body
            .get("url")
            .and_then(JsonValue::as_str)
            .map(str::to_string),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "rejected analyze request body");
            None
        }
    }
    .ok_or_else(ApiError::invalid_url)?;

    let result = state.analyzer.analyze(&url).await?;
    Ok(Json(result))
}

async fn health() -> impl IntoResponse {
    Json(HealthData {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}
