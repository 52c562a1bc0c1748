//! Application startup and lifecycle management.

use crate::config::AssistantConfig;
use crate::handlers;
use axum::{
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::with_common_layers;
use service_core::providers::openrouter::OpenRouterChatProvider;
use service_core::providers::TextProvider;
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn TextProvider>,
    pub max_message_length: usize,
}

/// Build the HTTP router for the given state.
pub fn router(state: AppState) -> Router {
    let app = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/chat", post(handlers::chat))
        .with_state(state);

    with_common_layers(app)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: AssistantConfig) -> Result<Self, AppError> {
        let provider = OpenRouterChatProvider::new(config.openrouter.clone()).map_err(|e| {
            tracing::error!("Failed to initialize OpenRouter provider: {}", e);
            AppError::ConfigError(anyhow::Error::new(e))
        })?;

        tracing::info!(
            model = %config.openrouter.model,
            max_message_length = config.max_message_length,
            "Initialized OpenRouter chat provider"
        );

        let state = AppState {
            provider: Arc::new(provider),
            max_message_length: config.max_message_length,
        };

        // Port 0 binds a random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Assistant service listening on port {}", port);

        let server = axum::serve(listener, router(state))
            .with_graceful_shutdown(service_core::shutdown_signal());

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}
