//! Config schema types (gateway, browser service, browser, streaming, client).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlimpseConfig {
    pub gateway: GatewayConfig,
    pub browser_service: BrowserServiceConfig,
    pub browser: BrowserConfig,
    pub stream: StreamConfig,
    pub browse_client: BrowseClientConfig,
    pub agents: AgentsConfig,
    /// Root of the user-visible workspace. Screenshots land under
    /// `<data_dir>/screenshots/`, downloadable files anywhere below it.
    pub data_dir: PathBuf,
}

impl Default for GlimpseConfig {
    fn default() -> Self {
        Self {
            gateway: GatewayConfig::default(),
            browser_service: BrowserServiceConfig::default(),
            browser: BrowserConfig::default(),
            stream: StreamConfig::default(),
            browse_client: BrowseClientConfig::default(),
            agents: AgentsConfig::default(),
            data_dir: PathBuf::from("user_data"),
        }
    }
}

/// Gateway (chat orchestrator) server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Address to bind to. Defaults to "127.0.0.1".
    pub bind: String,
    /// Port to listen on.
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".into(),
            port: 5001,
        }
    }
}

/// Browser automation service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserServiceConfig {
    /// Address to bind to. The service usually runs in a container, so it
    /// defaults to all interfaces.
    pub bind: String,
    /// Port to listen on.
    pub port: u16,
}

impl Default for BrowserServiceConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".into(),
            port: 5002,
        }
    }
}

/// Browser (Chrome/Chromium) launch configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Path to Chrome/Chromium binary (auto-detected if not set).
    pub chrome_path: Option<String>,
    /// Whether to run in headless mode.
    pub headless: bool,
    /// Default viewport width.
    pub viewport_width: u32,
    /// Default viewport height.
    pub viewport_height: u32,
    /// Default navigation timeout in milliseconds.
    pub navigation_timeout_ms: u64,
    /// Additional Chrome arguments.
    #[serde(default)]
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

/// Token streaming configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Delay between streamed tokens in milliseconds.
    pub token_delay_ms: u64,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self { token_delay_ms: 10 }
    }
}

/// Browse client (gateway → browser service) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowseClientConfig {
    /// Base URL of the browser automation service.
    pub endpoint: String,
    /// Health check timeout in seconds.
    pub health_timeout_secs: u64,
    /// Browse call timeout in seconds.
    pub browse_timeout_secs: u64,
    /// Fixed backoff between attempts in seconds.
    pub retry_backoff_secs: u64,
    /// Retries after the first attempt (total attempts = max_retries + 1).
    pub max_retries: u32,
}

impl Default for BrowseClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:5002".into(),
            health_timeout_secs: 5,
            browse_timeout_secs: 60,
            retry_backoff_secs: 2,
            max_retries: 2,
        }
    }
}

/// Agent catalog configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentsConfig {
    /// Anthropic API key; when set, the coding persona is built in its
    /// Claude-flavored variant. Supports `${ANTHROPIC_API_KEY}` substitution.
    pub anthropic_api_key: Option<String>,
}

impl AgentsConfig {
    /// Whether the Claude coding variant should be used.
    ///
    /// An unresolved `${...}` placeholder (env var absent at load time) does
    /// not count as a configured key.
    pub fn claude_available(&self) -> bool {
        self.anthropic_api_key
            .as_deref()
            .is_some_and(|k| !k.is_empty() && !k.starts_with("${"))
    }
}

impl GlimpseConfig {
    /// Directory screenshots are written under.
    pub fn screenshots_dir(&self) -> PathBuf {
        self.data_dir.join("screenshots")
    }
}
