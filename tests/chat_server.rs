//! End-to-end tests of the HTTP surface with fake services behind it.

mod common;

use common::*;
use ragchat::config::Config;
use ragchat::server::router;
use serde_json::{json, Value};

/// Serve the router on an ephemeral port and return its base URL.
async fn spawn_server(h: &Harness) -> (String, tokio::task::JoinHandle<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(h.services.clone());
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    (format!("http://{}", addr), handle)
}

fn default_harness() -> Harness {
    harness(
        Config::default(),
        FakeEmbedder::ok(),
        FakeIndex::with_hits(vec![text_hit("A"), text_hit("B")]),
        FakeGenerator::answering("Answer123"),
    )
}

#[tokio::test]
async fn test_root_liveness() {
    let h = default_harness();
    let (base, handle) = spawn_server(&h).await;

    let resp = reqwest::get(format!("{}/", base)).await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "message": "Server is running!" }));

    let resp = reqwest::get(format!("{}/health", base)).await.unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");

    handle.abort();
}

#[tokio::test]
async fn test_chat_reply() {
    let h = default_harness();
    let (base, handle) = spawn_server(&h).await;

    let resp = reqwest::Client::new()
        .post(format!("{}/chat", base))
        .json(&json!({ "message": "What is a humanoid robot?" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "reply": "Answer123" }));

    handle.abort();
}

#[tokio::test]
async fn test_chat_missing_message() {
    let h = default_harness();
    let (base, handle) = spawn_server(&h).await;

    let resp = reqwest::Client::new()
        .post(format!("{}/chat", base))
        .json(&json!({ "text": "wrong field" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "error": "No message provided" }));
    assert_eq!(h.embedder.call_count(), 0);

    handle.abort();
}

#[tokio::test]
async fn test_chat_malformed_body() {
    let h = default_harness();
    let (base, handle) = spawn_server(&h).await;

    let resp = reqwest::Client::new()
        .post(format!("{}/chat", base))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].is_string());
    assert!(body.get("reply").is_none());

    handle.abort();
}

#[tokio::test]
async fn test_chat_service_failure_is_a_reply() {
    let h = harness(
        Config::default(),
        FakeEmbedder::failing(),
        FakeIndex::with_hits(Vec::new()),
        FakeGenerator::answering("unused"),
    );
    let (base, handle) = spawn_server(&h).await;

    let resp = reqwest::Client::new()
        .post(format!("{}/chat", base))
        .json(&json!({ "message": "hello" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body,
        json!({ "reply": "Sorry, embedding generation failed." })
    );

    handle.abort();
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let h = default_harness();
    let (base, handle) = spawn_server(&h).await;

    let resp = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, format!("{}/chat", base))
        .header("origin", "https://book.example.com")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );

    handle.abort();
}
