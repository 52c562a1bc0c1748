use crate::startup::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use service_core::providers::{GenerationParams, ProviderError};
use thiserror::Error;

/// System prompt steering the model towards detailed, markdown-formatted answers.
pub const SYSTEM_PROMPT: &str = "You are a highly professional, expert-level AI assistant. \
When asked a complex question, provide a detailed, well-structured, and comprehensive answer, \
using markdown for formatting, headings, and lists where appropriate.";

/// Sampling temperature for chat replies.
pub const CHAT_TEMPERATURE: f32 = 0.9;

pub const EMPTY_REPLY: &str = "The AI returned an empty response.";

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Failures of `/chat`. The body always uses the `response` key so the chat
/// client can render errors inline.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Please enter a message.")]
    EmptyMessage,

    #[error("Message exceeds the maximum length of {0} characters.")]
    MessageTooLong(usize),

    #[error("Error: Failed to get response from AI. Details: HTTP {0}")]
    UpstreamStatus(u16),

    #[error("An unexpected error occurred while communicating with the AI service.")]
    Upstream,
}

impl From<ProviderError> for ChatError {
    fn from(err: ProviderError) -> Self {
        match err.upstream_status() {
            Some(status) => ChatError::UpstreamStatus(status),
            None => ChatError::Upstream,
        }
    }
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let status = match self {
            ChatError::EmptyMessage | ChatError::MessageTooLong(_) => StatusCode::BAD_REQUEST,
            ChatError::UpstreamStatus(_) | ChatError::Upstream => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (
            status,
            Json(ChatResponse {
                response: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Trim the message and enforce the length cap (counted in characters).
pub fn validate_message(raw: Option<&str>, max_len: usize) -> Result<&str, ChatError> {
    let message = raw.map(str::trim).unwrap_or_default();

    if message.is_empty() {
        return Err(ChatError::EmptyMessage);
    }
    if message.chars().count() > max_len {
        return Err(ChatError::MessageTooLong(max_len));
    }

    Ok(message)
}

pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ChatError> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Rejected malformed chat body");
            return Err(ChatError::EmptyMessage);
        }
    };

    let message = validate_message(request.message.as_deref(), state.max_message_length)?;

    let params = GenerationParams {
        temperature: Some(CHAT_TEMPERATURE),
        system_instruction: Some(SYSTEM_PROMPT.to_string()),
        ..Default::default()
    };

    let reply = state
        .provider
        .generate(message, &params)
        .await
        .map_err(|e| {
            tracing::error!(
                error = %e,
                model = %state.provider.model(),
                "OpenRouter request failed"
            );
            ChatError::from(e)
        })?;

    tracing::info!(
        input_tokens = reply.input_tokens,
        output_tokens = reply.output_tokens,
        "Chat reply generated"
    );

    let response = reply
        .text
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| EMPTY_REPLY.to_string());

    Ok(Json(ChatResponse { response }))
}
