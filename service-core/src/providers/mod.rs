//! Upstream model provider abstractions and implementations.
//!
//! Services talk to a `TextProvider` and never to a vendor API directly,
//! so the Gemini and OpenRouter backends are interchangeable in handlers.

pub mod gemini;
pub mod openrouter;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Timeout applied to every upstream HTTP call.
pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(120);

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Content filtered")]
    ContentFiltered,

    #[error("Network error: {0}")]
    NetworkError(String),
}

impl ProviderError {
    /// HTTP status reported by the upstream API, if the failure carried one.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            ProviderError::ApiError { status, .. } => Some(*status),
            ProviderError::RateLimited => Some(429),
            _ => None,
        }
    }
}

/// Result of a provider response.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    /// Text content; `None` when the model produced nothing usable.
    pub text: Option<String>,

    /// Input tokens consumed.
    pub input_tokens: i32,

    /// Output tokens generated.
    pub output_tokens: i32,

    /// Finish reason.
    pub finish_reason: FinishReason,
}

/// Reason why generation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Complete,
    Length,
    ContentFilter,
    Error,
}

/// Generation parameters for AI requests.
#[derive(Debug, Clone, Default)]
pub struct GenerationParams {
    /// Temperature (0.0 - 2.0).
    pub temperature: Option<f32>,

    /// Top-p sampling.
    pub top_p: Option<f32>,

    /// Maximum output tokens.
    pub max_tokens: Option<i32>,

    /// Stop sequences.
    pub stop_sequences: Vec<String>,

    /// System prompt sent ahead of the user turn.
    pub system_instruction: Option<String>,
}

/// Trait for text generation providers.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Generate a text response for a single user prompt.
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError>;

    /// Health check.
    async fn health_check(&self) -> Result<(), ProviderError>;

    /// Model identifier requests are sent to.
    fn model(&self) -> &str;
}

/// Build the shared reqwest client used by a provider.
pub(crate) fn build_client() -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .timeout(UPSTREAM_TIMEOUT)
        .build()
        .map_err(|e| ProviderError::NotConfigured(format!("Failed to create HTTP client: {}", e)))
}

/// Transport failure, with the request URL stripped from the message.
pub(crate) fn network_error(err: reqwest::Error) -> ProviderError {
    ProviderError::NetworkError(err.without_url().to_string())
}

pub(crate) fn decode_error(err: reqwest::Error) -> ProviderError {
    ProviderError::InvalidResponse(format!("Failed to parse response: {}", err.without_url()))
}

/// Map a non-success upstream status to a provider error.
pub(crate) async fn error_from_response(response: reqwest::Response) -> ProviderError {
    let status = response.status();
    let error_text = response.text().await.unwrap_or_default();

    if status.as_u16() == 429 {
        return ProviderError::RateLimited;
    }

    ProviderError::ApiError {
        status: status.as_u16(),
        message: error_text,
    }
}
