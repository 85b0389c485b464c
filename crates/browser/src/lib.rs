//! Managed Chromium walkthroughs over CDP.
//!
//! One browse request produces one fixed choreography: load the page, scroll
//! through it, then scroll to, hover over, and interact with a capped set of
//! links, buttons, and inputs, capturing a screenshot plus a cursor position
//! at every step. Sessions are per-request: a browser is launched when the
//! walkthrough starts and torn down when it ends, and a single session slot
//! serializes concurrent requests.

pub mod artifacts;
pub mod detect;
pub mod error;
pub mod script;
pub mod service;
pub mod session;
pub mod types;

pub use {
    artifacts::ArtifactStore,
    error::BrowserError,
    service::{ServiceState, build_service_app, start_service},
    session::SessionManager,
    types::BrowserConfig,
};
