//! Browser error types.

use thiserror::Error;

/// Errors that can occur while driving a walkthrough.
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("browser not available: Chrome/Chromium not found")]
    BrowserNotAvailable,

    #[error("browser launch failed: {0}")]
    LaunchFailed(String),

    #[error("browser relaunch failed: {0}")]
    RelaunchFailed(String),

    #[error("navigation failed: {0}")]
    NavigationFailed(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("JavaScript evaluation failed: {0}")]
    JsEvalFailed(String),

    #[error("screenshot failed: {0}")]
    ScreenshotFailed(String),

    #[error("CDP error: {0}")]
    Cdp(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<chromiumoxide::error::CdpError> for BrowserError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        BrowserError::Cdp(err.to_string())
    }
}

impl BrowserError {
    /// Error text placed in the `/browse` failure body. Launch-phase failures
    /// get their own fixed messages; everything else is wrapped uniformly.
    pub fn public_message(&self) -> String {
        match self {
            BrowserError::BrowserNotAvailable | BrowserError::LaunchFailed(_) => {
                "Failed to initialize browser session".to_string()
            },
            BrowserError::RelaunchFailed(_) => {
                "Failed to reinitialize browser session after navigation error".to_string()
            },
            other => format!("Error browsing website: {other}"),
        }
    }
}
