//! Shared gateway state.

use {
    std::{path::PathBuf, sync::Arc},
    glimpse_agents::{CatalogError, PersonaCatalog},
    glimpse_config::GlimpseConfig,
    tokio::sync::Mutex,
    crate::browse::{BrowseClient, VisualBrowser},
};

/// State handed to every gateway handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GlimpseConfig>,
    pub catalog: Arc<PersonaCatalog>,
    pub browser: Arc<dyn VisualBrowser>,
    /// Message posted via `POST /api/chat/stream`, consumed by the next GET.
    pub pending_message: Arc<Mutex<Option<String>>>,
}

impl AppState {
    /// Builds state backed by the real browser automation service.
    pub fn new(config: GlimpseConfig) -> Result<Self, CatalogError> {
        let browser = Arc::new(BrowseClient::from_config(&config.browse_client));
        Self::with_browser(config, browser)
    }

    /// Builds state with an explicit browser implementation.
    pub fn with_browser(
        config: GlimpseConfig,
        browser: Arc<dyn VisualBrowser>,
    ) -> Result<Self, CatalogError> {
        let catalog = PersonaCatalog::new(config.agents.claude_available())?;
        Ok(Self {
            config: Arc::new(config),
            catalog: Arc::new(catalog),
            browser,
            pending_message: Arc::new(Mutex::new(None)),
        })
    }

    /// Root directory user-visible files live under.
    pub fn data_root(&self) -> PathBuf {
        self.config.data_dir.clone()
    }
}
