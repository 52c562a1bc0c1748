//! Test helpers for eduplanner-service integration tests.

#![allow(dead_code)]

use eduplanner_service::config::{
    CacheConfig, EduPlannerConfig, DEFAULT_CACHE_MAX_ENTRIES, DEFAULT_CACHE_TIMEOUT_SECONDS,
    DEFAULT_MODEL,
};
use eduplanner_service::services::SkillTreeGenerator;
use eduplanner_service::startup::Application;
use serde_json::{json, Value};
use service_core::config::Config;
use service_core::providers::gemini::GeminiConfig;
use std::sync::Arc;
use std::time::Duration;

pub const GENERATE_PATH: &str = "/models/gemini-2.5-flash:generateContent";

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
    pub generator: Arc<SkillTreeGenerator>,
}

impl TestApp {
    pub async fn spawn(upstream_url: &str) -> Self {
        Self::spawn_with_cache(
            upstream_url,
            CacheConfig {
                timeout_seconds: DEFAULT_CACHE_TIMEOUT_SECONDS,
                max_entries: DEFAULT_CACHE_MAX_ENTRIES,
            },
        )
        .await
    }

    /// Spawn the service on a random port, pointed at `upstream_url`.
    pub async fn spawn_with_cache(upstream_url: &str, cache: CacheConfig) -> Self {
        let config = EduPlannerConfig {
            common: Config {
                port: 0,
                environment: "test".to_string(),
            },
            gemini: GeminiConfig {
                api_key: "test-gemini-key".to_string(),
                model: DEFAULT_MODEL.to_string(),
                base_url: upstream_url.to_string(),
            },
            cache,
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build application");
        let address = format!("http://127.0.0.1:{}", app.port());
        let generator = app.generator().clone();

        tokio::spawn(async move {
            let _ = app.run_until_stopped().await;
        });

        tokio::time::sleep(Duration::from_millis(50)).await;

        Self {
            address,
            client: reqwest::Client::new(),
            generator,
        }
    }

    pub async fn post_domain(&self, body: Value) -> reqwest::Response {
        self.client
            .post(format!("{}/generate_skill_tree", self.address))
            .json(&body)
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .expect("Failed to send request")
    }
}

/// Gemini `generateContent` body carrying `text` as the only part.
pub fn gemini_text(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }],
        "usageMetadata": { "promptTokenCount": 310, "candidatesTokenCount": 1200 }
    })
}

pub fn sample_tree(domain: &str) -> Value {
    json!({
        "domain": domain,
        "primary_skills": [{
            "name": "Ownership",
            "description": "Moves, borrows and lifetimes",
            "estimated_hours": 12,
            "milestones": [{
                "name": "Borrow checker basics",
                "target": "Explain shared vs mutable borrows",
                "estimated_hours": 4,
                "resources": [{ "title": "The Book ch. 4", "url": "https://doc.rust-lang.org/book/ch04-00-understanding-ownership.html" }]
            }]
        }]
    })
}
