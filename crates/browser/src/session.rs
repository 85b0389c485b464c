//! Browser session lifecycle.
//!
//! Sessions are per-request: each walkthrough launches a fresh browser and
//! tears it down before the response is returned, so no page state leaks
//! between requests. A single slot mutex serializes walkthroughs since the
//! choreography assumes it owns the display.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use {
    chromiumoxide::{
        Browser, BrowserConfig as CdpBrowserConfig, Page,
        cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams,
    },
    futures::StreamExt,
    tokio::sync::Mutex,
    tracing::{debug, info, warn},
};

use glimpse_protocol::BrowseResult;

use crate::{
    artifacts::ArtifactStore,
    detect,
    error::BrowserError,
    script,
    types::BrowserConfig,
};

/// Settle time after navigation before the first capture.
const PAGE_SETTLE: Duration = Duration::from_secs(2);

/// Launches one browser per walkthrough and serializes them.
pub struct SessionManager {
    config: BrowserConfig,
    artifacts: ArtifactStore,
    slot: Mutex<()>,
}

impl SessionManager {
    pub fn new(config: BrowserConfig, artifacts: ArtifactStore) -> Self {
        Self {
            config,
            artifacts,
            slot: Mutex::new(()),
        }
    }

    /// Run the recorded walkthrough against `url`.
    ///
    /// Holds the session slot for the whole request. If the first navigation
    /// fails the browser is torn down and relaunched once; a second failure
    /// is returned to the caller.
    pub async fn run_walkthrough(&self, url: &str) -> Result<BrowseResult, BrowserError> {
        validate_url(url)?;

        let _slot = self.slot.lock().await;
        let timestamp = unix_timestamp();
        let run = self.artifacts.begin_run(timestamp).await?;

        let mut session = BrowserSession::launch(&self.config).await?;
        if let Err(e) = session.goto_settled(url).await {
            warn!(url, error = %e, "navigation failed, relaunching browser");
            session.shutdown();
            session = BrowserSession::launch(&self.config)
                .await
                .map_err(|e| BrowserError::RelaunchFailed(e.to_string()))?;
            session.goto_settled(url).await?;
        }

        let outcome = script::record_walkthrough(session.page(), url, &run).await;
        session.shutdown();
        outcome
    }
}

/// One launched browser and its page.
struct BrowserSession {
    id: String,
    browser: Browser,
    page: Page,
}

impl BrowserSession {
    async fn launch(config: &BrowserConfig) -> Result<Self, BrowserError> {
        let Some(executable) = detect::detect_browser(config.chrome_path.as_deref()) else {
            warn!("{}", detect::install_hint());
            return Err(BrowserError::BrowserNotAvailable);
        };

        let mut builder = CdpBrowserConfig::builder();
        if !config.headless {
            builder = builder.with_head();
        }
        builder = builder
            .viewport(chromiumoxide::handler::viewport::Viewport {
                width: config.viewport_width,
                height: config.viewport_height,
                device_scale_factor: Some(1.0),
                emulating_mobile: false,
                is_landscape: true,
                has_touch: false,
            })
            .request_timeout(Duration::from_millis(config.navigation_timeout_ms))
            .chrome_executable(&executable);

        for arg in &config.chrome_args {
            builder = builder.arg(arg);
        }
        builder = builder
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-software-rasterizer")
            .arg("--no-sandbox")
            .arg("--disable-setuid-sandbox");

        let cdp_config = builder
            .build()
            .map_err(BrowserError::LaunchFailed)?;

        let (browser, mut handler) = Browser::launch(cdp_config)
            .await
            .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;

        let id = generate_session_id();
        let handler_id = id.clone();
        // The handler drains CDP traffic and exits when the connection closes.
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                debug!(session_id = handler_id, ?event, "browser event");
            }
            debug!(session_id = handler_id, "browser event handler exited");
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;

        let viewport_cmd = SetDeviceMetricsOverrideParams::builder()
            .width(config.viewport_width)
            .height(config.viewport_height)
            .device_scale_factor(1.0)
            .mobile(false)
            .build()
            .map_err(BrowserError::Cdp)?;
        if let Err(e) = page.execute(viewport_cmd).await {
            warn!(session_id = id, error = %e, "failed to set page viewport");
        }

        info!(
            session_id = id,
            executable = %executable.display(),
            viewport_width = config.viewport_width,
            viewport_height = config.viewport_height,
            headless = config.headless,
            "launched walkthrough browser"
        );

        Ok(Self { id, browser, page })
    }

    fn page(&self) -> &Page {
        &self.page
    }

    /// Navigate and let the page settle before the choreography starts.
    async fn goto_settled(&self, url: &str) -> Result<(), BrowserError> {
        self.page
            .goto(url)
            .await
            .map_err(|e| BrowserError::NavigationFailed(e.to_string()))?;
        let _ = self.page.wait_for_navigation().await;
        tokio::time::sleep(PAGE_SETTLE).await;
        Ok(())
    }

    /// Tear the session down. Pages are closed and the child process is
    /// killed when the browser handle drops.
    fn shutdown(self) {
        info!(session_id = self.id, "closing walkthrough browser");
        drop(self.browser);
    }
}

/// Generate a random session ID.
fn generate_session_id() -> String {
    use rand::Rng;
    let mut rng = rand::rng();
    let id: u64 = rng.random();
    format!("walkthrough-{id:016x}")
}

fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Validate a target before handing it to the browser. Only http and https
/// navigations are accepted.
pub(crate) fn validate_url(url: &str) -> Result<(), BrowserError> {
    if url.is_empty() {
        return Err(BrowserError::InvalidUrl("URL cannot be empty".into()));
    }

    let parsed = url::Url::parse(url).map_err(|e| {
        BrowserError::InvalidUrl(format!("invalid URL '{}': {e}", truncate_url(url)))
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(BrowserError::InvalidUrl(format!(
            "unsupported URL scheme '{scheme}', only http/https allowed"
        ))),
    }
}

/// Truncate long URLs for error readability.
fn truncate_url(url: &str) -> String {
    const MAX: usize = 120;
    if url.chars().count() <= MAX {
        url.to_string()
    } else {
        let cut: String = url.chars().take(MAX).collect();
        format!("{cut}…")
    }
}
