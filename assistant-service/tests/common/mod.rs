//! Test helpers for assistant-service integration tests.
//!
//! OpenRouter is replaced by a wiremock server, so no API key or network
//! access is needed.

#![allow(dead_code)]

use assistant_service::config::{AssistantConfig, DEFAULT_MAX_MESSAGE_LENGTH};
use assistant_service::startup::Application;
use serde_json::{json, Value};
use service_core::config::Config;
use service_core::providers::openrouter::OpenRouterConfig;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Spawn the service on a random port, pointed at `upstream_url`.
    pub async fn spawn(upstream_url: &str) -> Self {
        let config = AssistantConfig {
            common: Config {
                port: 0,
                environment: "test".to_string(),
            },
            openrouter: OpenRouterConfig {
                api_key: "test-openrouter-key".to_string(),
                model: "qwen/qwen3-235b-a22b:free".to_string(),
                base_url: upstream_url.to_string(),
            },
            max_message_length: DEFAULT_MAX_MESSAGE_LENGTH,
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build application");
        let address = format!("http://127.0.0.1:{}", app.port());

        tokio::spawn(async move {
            let _ = app.run_until_stopped().await;
        });

        // Wait for server to start
        tokio::time::sleep(Duration::from_millis(50)).await;

        Self {
            address,
            client: reqwest::Client::new(),
        }
    }

    pub async fn post_chat(&self, body: Value) -> reqwest::Response {
        self.client
            .post(format!("{}/chat", self.address))
            .json(&body)
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .expect("Failed to send request")
    }
}

/// Mount a successful chat completion returning `content`.
pub async fn mount_completion(server: &MockServer, content: &str) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "gen-1",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }],
            "usage": { "prompt_tokens": 12, "completion_tokens": 4, "total_tokens": 16 }
        })))
        .mount(server)
        .await;
}
