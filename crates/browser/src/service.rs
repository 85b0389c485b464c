//! HTTP surface of the browser automation service.
//!
//! Two routes: `GET /health` for liveness probes and `POST /browse` to run
//! one recorded walkthrough. Walkthroughs execute one at a time; callers
//! queue on the session slot.

use std::sync::Arc;

use {
    axum::{
        Router,
        extract::State,
        http::StatusCode,
        response::{IntoResponse, Json, Response},
        routing::{get, post},
    },
    tracing::{error, info},
};

use {
    glimpse_config::GlimpseConfig,
    glimpse_protocol::{
        BROWSE_ENDPOINT, BrowseFailure, BrowseRequest, HEALTH_ENDPOINT, HealthStatus,
    },
};

use crate::{artifacts::ArtifactStore, session::SessionManager, types::BrowserConfig};

// ── Shared app state ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct ServiceState {
    pub sessions: Arc<SessionManager>,
}

// ── Server startup ───────────────────────────────────────────────────────────

/// Build the service router (shared between production startup and tests).
pub fn build_service_app(state: ServiceState) -> Router {
    Router::new()
        .route(HEALTH_ENDPOINT, get(health_handler))
        .route(BROWSE_ENDPOINT, post(browse_handler))
        .with_state(state)
}

/// Start the browser automation HTTP service.
pub async fn start_service(config: &GlimpseConfig) -> anyhow::Result<()> {
    let browser_config = BrowserConfig::from(&config.browser);
    let artifacts = ArtifactStore::new(config.data_dir.clone());
    let state = ServiceState {
        sessions: Arc::new(SessionManager::new(browser_config, artifacts)),
    };
    let app = build_service_app(state);

    let addr = format!(
        "{}:{}",
        config.browser_service.bind, config.browser_service.port
    );
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "browser service listening");
    axum::serve(listener, app).await?;
    Ok(())
}

// ── Handlers ─────────────────────────────────────────────────────────────────

async fn health_handler() -> impl IntoResponse {
    Json(HealthStatus::healthy())
}

async fn browse_handler(
    State(state): State<ServiceState>,
    Json(request): Json<BrowseRequest>,
) -> Response {
    info!(url = %request.url, "browse request received");
    match state.sessions.run_walkthrough(&request.url).await {
        Ok(result) => {
            info!(url = %request.url, steps = result.step_count(), "walkthrough complete");
            (StatusCode::OK, Json(result)).into_response()
        },
        Err(e) => {
            error!(url = %request.url, error = %e, "walkthrough failed");
            let failure = BrowseFailure {
                error: e.public_message(),
                url: request.url,
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(failure)).into_response()
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    use std::net::SocketAddr;

    async fn spawn_service() -> (SocketAddr, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let state = ServiceState {
            sessions: Arc::new(SessionManager::new(
                BrowserConfig::default(),
                ArtifactStore::new(dir.path()),
            )),
        };
        let app = build_service_app(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (addr, dir)
    }

    #[tokio::test]
    async fn health_endpoint_reports_healthy() {
        let (addr, _data_dir) = spawn_service().await;
        let body: serde_json::Value = reqwest::get(format!("http://{addr}/health"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body, serde_json::json!({ "status": "healthy" }));
    }

    #[tokio::test]
    async fn rejected_urls_come_back_as_browse_failures() {
        let (addr, _data_dir) = spawn_service().await;
        let response = reqwest::Client::new()
            .post(format!("http://{addr}/browse"))
            .json(&serde_json::json!({ "url": "ftp://files.example.com" }))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["url"], "ftp://files.example.com");
        let message = body["error"].as_str().unwrap();
        assert!(message.starts_with("Error browsing website:"), "{message}");
    }
}
