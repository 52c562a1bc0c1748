use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// Liveness probe, with cache occupancy for operators.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "eduplanner-service",
        "version": env!("CARGO_PKG_VERSION"),
        "cached_domains": state.generator.cache().len()
    }))
}

pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.provider.health_check().await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Gemini readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
