use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// Liveness probe.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "content-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness probe: ready once Gemini accepts our key.
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.provider.health_check().await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Gemini readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
