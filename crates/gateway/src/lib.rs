//! Chat gateway: persona routing, simulated token streaming, file serving,
//! and the client for the browser automation service.

pub mod browse;
pub mod chat;
pub mod files;
pub mod respond;
pub mod server;
pub mod state;
pub mod stream;

pub use {
    browse::{BrowseClient, ClientError, NoopBrowser, VisualBrowser, normalize_url},
    server::{build_gateway_app, start_gateway},
    state::AppState,
};
