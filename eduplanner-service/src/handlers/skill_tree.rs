use crate::startup::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderName,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use service_core::error::AppError;

/// Response header telling whether the tree came from the cache.
pub const CACHE_STATUS_HEADER: HeaderName = HeaderName::from_static("x-cache");

#[derive(Debug, Deserialize)]
pub struct SkillTreeRequest {
    #[serde(default)]
    pub domain: Option<String>,
}

pub async fn generate_skill_tree(
    State(state): State<AppState>,
    payload: Result<Json<SkillTreeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let domain = payload
        .ok()
        .and_then(|Json(request)| request.domain)
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
        .ok_or_else(|| AppError::bad_request("Domain is required"))?;

    let (tree, cache_status) = state.generator.generate(&domain).await.map_err(|e| {
        tracing::error!(
            error = %e,
            domain = %domain,
            model = %state.generator.model(),
            "Error generating skill tree"
        );
        AppError::from(e)
    })?;

    Ok(([(CACHE_STATUS_HEADER, cache_status.as_str())], Json(tree)))
}
