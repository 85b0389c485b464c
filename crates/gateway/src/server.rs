//! Gateway HTTP server.

use {
    axum::{
        Json, Router,
        routing::{get, post},
    },
    glimpse_config::GlimpseConfig,
    tower_http::cors::{Any, CorsLayer},
    tracing::info,
    crate::{
        chat::chat_handler,
        files::{download_handler, files_handler, screenshot_handler},
        state::AppState,
        stream::{stream_get_handler, stream_post_handler},
    },
};

/// Builds the gateway router. CORS is wide open so the front end can be
/// served from any origin.
pub fn build_gateway_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/chat", post(chat_handler))
        .route(
            "/api/chat/stream",
            get(stream_get_handler).post(stream_post_handler),
        )
        .route("/api/files", get(files_handler))
        .route("/download/{*path}", get(download_handler))
        .route("/view/screenshot/{*path}", get(screenshot_handler))
        .layer(cors)
        .with_state(state)
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok", "service": "glimpse-gateway"}))
}

/// Binds the gateway and serves until the process exits.
pub async fn start_gateway(config: &GlimpseConfig) -> anyhow::Result<()> {
    let state = AppState::new(config.clone())?;
    let addr = format!("{}:{}", config.gateway.bind, config.gateway.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "gateway listening");
    axum::serve(listener, build_gateway_app(state)).await?;
    Ok(())
}
