use crate::startup::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use service_core::providers::GenerationParams;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub result: String,
}

pub async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, AppError> {
    let prompt = payload
        .ok()
        .and_then(|Json(request)| request.prompt)
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| AppError::bad_request("No prompt provided"))?;

    let response = state
        .provider
        .generate(&prompt, &GenerationParams::default())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, model = %state.provider.model(), "Gemini request failed");
            AppError::from(e)
        })?;

    let result = response.text.ok_or_else(|| {
        tracing::error!(finish_reason = ?response.finish_reason, "Gemini returned no text");
        AppError::Upstream("Gemini returned no text output".to_string())
    })?;

    tracing::info!(
        input_tokens = response.input_tokens,
        output_tokens = response.output_tokens,
        "Content generated"
    );

    Ok(Json(GenerateResponse { result }))
}
