//! Launch settings for walkthrough sessions.

use serde::{Deserialize, Serialize};

/// Browser launch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Path to Chrome/Chromium binary (auto-detected if not set).
    pub chrome_path: Option<String>,
    /// Whether to run in headless mode.
    pub headless: bool,
    /// Viewport width.
    pub viewport_width: u32,
    /// Viewport height.
    pub viewport_height: u32,
    /// Navigation timeout in milliseconds.
    pub navigation_timeout_ms: u64,
    /// Additional Chrome arguments.
    pub chrome_args: Vec<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            chrome_path: None,
            headless: true,
            viewport_width: 1280,
            viewport_height: 800,
            navigation_timeout_ms: 30_000,
            chrome_args: Vec::new(),
        }
    }
}

impl From<&glimpse_config::schema::BrowserConfig> for BrowserConfig {
    fn from(cfg: &glimpse_config::schema::BrowserConfig) -> Self {
        Self {
            chrome_path: cfg.chrome_path.clone(),
            headless: cfg.headless,
            viewport_width: cfg.viewport_width,
            viewport_height: cfg.viewport_height,
            navigation_timeout_ms: cfg.navigation_timeout_ms,
            chrome_args: cfg.chrome_args.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_demo_viewport() {
        let config = BrowserConfig::default();
        assert!(config.headless);
        assert_eq!(config.viewport_width, 1280);
        assert_eq!(config.viewport_height, 800);
        assert_eq!(config.navigation_timeout_ms, 30_000);
    }

    #[test]
    fn converts_from_schema_config() {
        let schema = glimpse_config::schema::BrowserConfig {
            chrome_path: Some("/usr/bin/chromium".into()),
            headless: false,
            ..Default::default()
        };
        let config = BrowserConfig::from(&schema);
        assert_eq!(config.chrome_path.as_deref(), Some("/usr/bin/chromium"));
        assert!(!config.headless);
        assert_eq!(config.viewport_width, schema.viewport_width);
    }
}
