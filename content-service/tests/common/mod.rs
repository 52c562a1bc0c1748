//! Test helpers for content-service integration tests.

#![allow(dead_code)]

use content_service::config::{ContentConfig, DEFAULT_MODEL};
use content_service::startup::Application;
use serde_json::{json, Value};
use service_core::config::Config;
use service_core::providers::gemini::GeminiConfig;
use std::time::Duration;

pub const GENERATE_PATH: &str = "/models/gemini-2.5-flash:generateContent";

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Spawn the service on a random port, pointed at `upstream_url`.
    pub async fn spawn(upstream_url: &str) -> Self {
        let config = ContentConfig {
            common: Config {
                port: 0,
                environment: "test".to_string(),
            },
            gemini: GeminiConfig {
                api_key: "test-google-key".to_string(),
                model: DEFAULT_MODEL.to_string(),
                base_url: upstream_url.to_string(),
            },
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build application");
        let address = format!("http://127.0.0.1:{}", app.port());

        tokio::spawn(async move {
            let _ = app.run_until_stopped().await;
        });

        tokio::time::sleep(Duration::from_millis(50)).await;

        Self {
            address,
            client: reqwest::Client::new(),
        }
    }

    pub async fn post_generate(&self, body: Value) -> reqwest::Response {
        self.client
            .post(format!("{}/generate", self.address))
            .json(&body)
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .expect("Failed to send request")
    }
}

/// Gemini `generateContent` body carrying a single text part.
pub fn gemini_text(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }],
        "usageMetadata": { "promptTokenCount": 5, "candidatesTokenCount": 9 }
    })
}
