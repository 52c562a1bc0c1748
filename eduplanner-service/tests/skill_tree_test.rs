mod common;

use common::{gemini_text, sample_tree, TestApp, GENERATE_PATH};
use eduplanner_service::config::CacheConfig;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn generates_tree_for_domain() {
    let upstream = MockServer::start().await;
    let tree = sample_tree("Rust");
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "test-gemini-key"))
        .and(body_string_contains("Domain: Rust\\n"))
        .and(body_partial_json(json!({
            "generationConfig": { "maxOutputTokens": 6000 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_text(&tree.to_string())))
        .expect(1)
        .mount(&upstream)
        .await;

    let app = TestApp::spawn(&upstream.uri()).await;
    let response = app.post_domain(json!({ "domain": "  Rust " })).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-cache"], "MISS");
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, tree);
}

#[tokio::test]
async fn fenced_output_is_unwrapped() {
    let upstream = MockServer::start().await;
    let tree = sample_tree("Cooking");
    let fenced = format!("```json\n{}\n```", serde_json::to_string_pretty(&tree).unwrap());
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_text(&fenced)))
        .mount(&upstream)
        .await;

    let app = TestApp::spawn(&upstream.uri()).await;
    let response = app.post_domain(json!({ "domain": "Cooking" })).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, tree);
}

#[tokio::test]
async fn repeated_domain_is_served_from_cache() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(gemini_text(&sample_tree("Go").to_string())),
        )
        .expect(1)
        .mount(&upstream)
        .await;

    let app = TestApp::spawn(&upstream.uri()).await;

    let first = app.post_domain(json!({ "domain": "Go" })).await;
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(first.headers()["x-cache"], "MISS");

    let second = app.post_domain(json!({ "domain": " Go" })).await;
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(second.headers()["x-cache"], "HIT");
    let body: Value = second.json().await.unwrap();
    assert_eq!(body, sample_tree("Go"));

    assert_eq!(app.generator.cache().len(), 1);
}

#[tokio::test]
async fn expired_tree_is_regenerated() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(gemini_text(&sample_tree("Go").to_string())),
        )
        .expect(2)
        .mount(&upstream)
        .await;

    let app = TestApp::spawn_with_cache(
        &upstream.uri(),
        CacheConfig {
            timeout_seconds: 1,
            max_entries: 500,
        },
    )
    .await;

    let first = app.post_domain(json!({ "domain": "Go" })).await;
    assert_eq!(first.headers()["x-cache"], "MISS");

    tokio::time::sleep(Duration::from_millis(1100)).await;

    let second = app.post_domain(json!({ "domain": "Go" })).await;
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(second.headers()["x-cache"], "MISS");
}

#[tokio::test]
async fn full_cache_drops_oldest_domain() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(gemini_text(&sample_tree("Any").to_string())),
        )
        .expect(3)
        .mount(&upstream)
        .await;

    let app = TestApp::spawn_with_cache(
        &upstream.uri(),
        CacheConfig {
            timeout_seconds: 600,
            max_entries: 1,
        },
    )
    .await;

    for domain in ["Go", "Rust", "Go"] {
        let response = app.post_domain(json!({ "domain": domain })).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-cache"], "MISS");
    }

    assert_eq!(app.generator.cache().len(), 1);
}

#[tokio::test]
async fn failures_are_not_cached() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&upstream)
        .await;

    let app = TestApp::spawn(&upstream.uri()).await;

    for _ in 0..2 {
        let response = app.post_domain(json!({ "domain": "Chess" })).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    assert_eq!(upstream.received_requests().await.unwrap().len(), 2);
    assert!(app.generator.cache().is_empty());
}

#[tokio::test]
async fn missing_domain_is_rejected() {
    let upstream = MockServer::start().await;
    let app = TestApp::spawn(&upstream.uri()).await;

    for body in [json!({}), json!({ "domain": "" }), json!({ "domain": "   " })] {
        let response = app.post_domain(body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Domain is required");
    }

    let response = app
        .client
        .post(format!("{}/generate_skill_tree", app.address))
        .body("not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert!(upstream.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn unreachable_upstream_returns_500_without_leaking_key() {
    let app = TestApp::spawn("http://127.0.0.1:9").await;
    let response = app.post_domain(json!({ "domain": "Rust" })).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.text().await.unwrap();
    assert!(!body.contains("test-gemini-key"));

    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["error"], "Network error: error sending request");
    assert!(app.generator.cache().is_empty());
}

#[tokio::test]
async fn non_json_upstream_body_returns_500() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("upstream proxy error"))
        .mount(&upstream)
        .await;

    let app = TestApp::spawn(&upstream.uri()).await;
    let response = app.post_domain(json!({ "domain": "Rust" })).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["error"],
        "Invalid response: Failed to parse response: error decoding response body"
    );
}

#[tokio::test]
async fn output_without_json_returns_500() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(gemini_text("I'm sorry, I can't build that curriculum.")),
        )
        .mount(&upstream)
        .await;

    let app = TestApp::spawn(&upstream.uri()).await;
    let response = app.post_domain(json!({ "domain": "Alchemy" })).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Failed to extract valid JSON");
}

#[tokio::test]
async fn empty_output_returns_500() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "role": "model" }, "finishReason": "MAX_TOKENS" }]
        })))
        .mount(&upstream)
        .await;

    let app = TestApp::spawn(&upstream.uri()).await;
    let response = app.post_domain(json!({ "domain": "Physics" })).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["error"],
        "Gemini returned no text output (likely max tokens issue)."
    );
}
