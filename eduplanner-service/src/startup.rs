//! Application startup and lifecycle management.

use crate::config::EduPlannerConfig;
use crate::handlers;
use crate::services::SkillTreeGenerator;
use axum::{
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::with_common_layers;
use service_core::providers::gemini::GeminiTextProvider;
use service_core::providers::TextProvider;
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn TextProvider>,
    pub generator: Arc<SkillTreeGenerator>,
}

impl AppState {
    pub fn new(provider: Arc<dyn TextProvider>, config: &EduPlannerConfig) -> Self {
        let generator = Arc::new(SkillTreeGenerator::new(
            provider.clone(),
            config.cache.ttl(),
            config.cache.max_entries,
        ));
        Self {
            provider,
            generator,
        }
    }
}

pub fn router(state: AppState) -> Router {
    let app = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/generate_skill_tree", post(handlers::generate_skill_tree))
        .with_state(state);

    with_common_layers(app)
}

/// Periodically drop expired cache entries so domains that are never requested
/// again do not pin memory.
fn spawn_cache_janitor(generator: Arc<SkillTreeGenerator>) {
    let ttl = generator.cache().ttl();
    if ttl.is_zero() {
        return;
    }

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(ttl);
        interval.tick().await;
        loop {
            interval.tick().await;
            let purged = generator.cache().purge_expired();
            if purged > 0 {
                tracing::debug!(purged, "Purged expired skill trees");
            }
        }
    });
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: EduPlannerConfig) -> Result<Self, AppError> {
        let provider = GeminiTextProvider::new(config.gemini.clone()).map_err(|e| {
            tracing::error!("Failed to initialize Gemini provider: {}", e);
            AppError::ConfigError(anyhow::Error::new(e))
        })?;

        tracing::info!(
            model = %config.gemini.model,
            cache_timeout_seconds = config.cache.timeout_seconds,
            cache_max_entries = config.cache.max_entries,
            "Initialized Gemini text provider"
        );

        let state = AppState::new(Arc::new(provider), &config);
        spawn_cache_janitor(state.generator.clone());

        // Port 0 binds a random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("EduPlanner service listening on port {}", port);

        let server = axum::serve(listener, router(state.clone()))
            .with_graceful_shutdown(service_core::shutdown_signal());

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
            state,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Skill-tree generator, exposed so tests can inspect the cache.
    pub fn generator(&self) -> &Arc<SkillTreeGenerator> {
        &self.state.generator
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}
