#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Integration tests for the gateway HTTP surface.

use std::{net::SocketAddr, sync::Arc};

use {
    glimpse_config::{GlimpseConfig, StreamConfig},
    serde_json::json,
    tokio::net::TcpListener,
};

use glimpse_gateway::{AppState, NoopBrowser, build_gateway_app};

/// Spin up a gateway on an ephemeral port with a temp data directory and a
/// stand-in browser. The TempDir guard keeps the directory alive.
async fn spawn_gateway() -> (SocketAddr, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = GlimpseConfig {
        data_dir: dir.path().to_path_buf(),
        stream: StreamConfig { token_delay_ms: 0 },
        ..GlimpseConfig::default()
    };
    let state = AppState::with_browser(config, Arc::new(NoopBrowser)).unwrap();
    let app = build_gateway_app(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, dir)
}

#[tokio::test]
async fn health_reports_the_service_name() {
    let (addr, _data) = spawn_gateway().await;

    let body: serde_json::Value = reqwest::get(format!("http://{addr}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body, json!({"status": "ok", "service": "glimpse-gateway"}));
}

#[tokio::test]
async fn chat_returns_the_delegation_path() {
    let (addr, _data) = spawn_gateway().await;
    let client = reqwest::Client::new();

    let body: serde_json::Value = client
        .post(format!("http://{addr}/api/chat"))
        .json(&json!({"message": "what's new in rust"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["agent_used"], "Web Search Agent");
    assert_eq!(body["agent_path"], "Admin Agent → Web Search Agent");
    assert_eq!(body["full_path"], json!(["Admin Agent", "Web Search Agent"]));
    assert!(
        body["response"]
            .as_str()
            .unwrap()
            .contains("'what's new in rust'")
    );
}

#[tokio::test]
async fn stream_replays_the_full_event_sequence() {
    let (addr, _data) = spawn_gateway().await;
    let client = reqwest::Client::new();

    let ack: serde_json::Value = client
        .post(format!("http://{addr}/api/chat/stream"))
        .json(&json!({"message": "browse https://example.com"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(ack, json!({"status": "message_received"}));

    let body = client
        .get(format!("http://{addr}/api/chat/stream"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(body.starts_with("data: {\"status\":\"started\"}"));
    assert!(body.contains("\"type\":\"agent_path\""));
    assert!(body.contains("\"path\":\"Web Browsing Agent\""));
    assert!(body.contains("\"type\":\"visual_data\""));
    assert!(body.contains("\"agent_used\":\"Web Browsing Agent\""));
    assert!(body.contains("data: {\"status\":\"completed\",\"enable_input\":true}"));
    assert!(body.trim_end().ends_with("event: close\ndata: {}"));
}

#[tokio::test]
async fn stream_without_a_pending_message_errors() {
    let (addr, _data) = spawn_gateway().await;

    let body = reqwest::get(format!("http://{addr}/api/chat/stream"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(body.contains("data: {\"status\":\"error\",\"message\":\"No message found\"}"));
    assert!(body.trim_end().ends_with("event: close\ndata: {}"));
}

#[tokio::test]
async fn files_and_screenshots_are_served_from_the_data_root() {
    let (addr, data) = spawn_gateway().await;
    let root = data.path();
    std::fs::create_dir_all(root.join("documents")).unwrap();
    std::fs::write(root.join("documents/note.txt"), b"remember the milk").unwrap();
    std::fs::create_dir_all(root.join("screenshots/visual_7")).unwrap();
    std::fs::write(root.join("screenshots/visual_7/step_0_7.png"), b"\x89PNGfake").unwrap();

    let listing: serde_json::Value = reqwest::get(format!("http://{addr}/api/files"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listing["documents"], json!(["note.txt"]));

    let download = reqwest::get(format!("http://{addr}/download/documents/note.txt"))
        .await
        .unwrap();
    assert_eq!(download.status(), reqwest::StatusCode::OK);
    assert_eq!(
        download
            .headers()
            .get("content-disposition")
            .unwrap()
            .to_str()
            .unwrap(),
        "attachment; filename=\"note.txt\"",
    );
    assert_eq!(download.bytes().await.unwrap().as_ref(), b"remember the milk");

    let shot = reqwest::get(format!(
        "http://{addr}/view/screenshot/screenshots/visual_7/step_0_7.png"
    ))
    .await
    .unwrap();
    assert_eq!(shot.status(), reqwest::StatusCode::OK);
    assert_eq!(
        shot.headers().get("content-type").unwrap().to_str().unwrap(),
        "image/png",
    );
    assert_eq!(shot.bytes().await.unwrap().as_ref(), b"\x89PNGfake");
}

#[tokio::test]
async fn path_traversal_is_refused() {
    let (addr, data) = spawn_gateway().await;
    std::fs::create_dir_all(data.path().join("documents")).unwrap();
    std::fs::create_dir_all(data.path().join("screenshots")).unwrap();
    std::fs::write(data.path().join("documents/note.txt"), b"private").unwrap();

    let escape = reqwest::get(format!("http://{addr}/download/..%2F..%2Fetc%2Fhostname"))
        .await
        .unwrap();
    assert_eq!(escape.status(), reqwest::StatusCode::NOT_FOUND);

    // The file exists under the data root, but not under screenshots/.
    let sideways = reqwest::get(format!("http://{addr}/view/screenshot/documents/note.txt"))
        .await
        .unwrap();
    assert_eq!(sideways.status(), reqwest::StatusCode::NOT_FOUND);
}
