//! Wire contract between the gateway and the browser automation service,
//! plus the SSE event payloads the gateway streams to the front end.
//!
//! All communication is JSON. The browse contract is internal to the two
//! processes; the stream events are consumed by the front end's EventSource.

use std::fmt;

use serde::{Deserialize, Serialize};

// ── Constants ────────────────────────────────────────────────────────────────

/// Browser automation service health endpoint.
pub const HEALTH_ENDPOINT: &str = "/health";
/// Browser automation service browse endpoint.
pub const BROWSE_ENDPOINT: &str = "/browse";
/// Health response body value for a live service.
pub const HEALTHY: &str = "healthy";
/// Target used when a browse request names no URL.
pub const DEFAULT_BROWSE_URL: &str = "https://www.example.com";

// ── Browse contract ──────────────────────────────────────────────────────────

/// Request body for `POST /browse`. A missing `url` falls back to
/// [`DEFAULT_BROWSE_URL`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowseRequest {
    #[serde(default = "default_browse_url")]
    pub url: String,
}

fn default_browse_url() -> String {
    DEFAULT_BROWSE_URL.into()
}

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn healthy() -> Self {
        Self {
            status: HEALTHY.into(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == HEALTHY
    }
}

/// Cursor position overlayed on a screenshot, in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CursorPosition {
    pub x: f64,
    pub y: f64,
}

/// Classification tag for one captured browsing step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    PageLoad,
    Scroll,
    ScrollToElement,
    HoverLink,
    HoverButton,
    HoverInput,
    HoverElement,
    ClickInput,
    Typing,
    PreClick,
    PostClick,
    FinalView,
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PageLoad => "page_load",
            Self::Scroll => "scroll",
            Self::ScrollToElement => "scroll_to_element",
            Self::HoverLink => "hover_link",
            Self::HoverButton => "hover_button",
            Self::HoverInput => "hover_input",
            Self::HoverElement => "hover_element",
            Self::ClickInput => "click_input",
            Self::Typing => "typing",
            Self::PreClick => "pre_click",
            Self::PostClick => "post_click",
            Self::FinalView => "final_view",
        };
        f.write_str(name)
    }
}

/// Successful browse response.
///
/// `screenshots`, `descriptions`, `cursor_positions`, and `interactions` are
/// positionally correlated: index *i* of each describes the same step.
/// Build through [`StepTrace`] to keep them in lock-step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowseResult {
    pub title: String,
    pub url: String,
    pub screenshots: Vec<String>,
    pub descriptions: Vec<String>,
    pub cursor_positions: Vec<Option<CursorPosition>>,
    pub interactions: Vec<InteractionKind>,
    pub content_preview: String,
    pub timestamp: u64,
}

impl BrowseResult {
    /// Number of captured steps.
    pub fn step_count(&self) -> usize {
        self.screenshots.len()
    }

    /// Whether the four correlated sequences have equal length.
    pub fn is_aligned(&self) -> bool {
        let n = self.screenshots.len();
        self.descriptions.len() == n
            && self.cursor_positions.len() == n
            && self.interactions.len() == n
    }
}

/// Error response body for a failed browse (HTTP 500).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowseFailure {
    pub error: String,
    pub url: String,
}

/// Lock-step builder for the four correlated step sequences.
///
/// The only way to append is [`StepTrace::push`], which takes one value for
/// each sequence, so a finished trace always satisfies
/// [`BrowseResult::is_aligned`].
#[derive(Debug, Default)]
pub struct StepTrace {
    screenshots: Vec<String>,
    descriptions: Vec<String>,
    cursor_positions: Vec<Option<CursorPosition>>,
    interactions: Vec<InteractionKind>,
}

impl StepTrace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one captured step.
    pub fn push(
        &mut self,
        screenshot: impl Into<String>,
        description: impl Into<String>,
        cursor: Option<CursorPosition>,
        interaction: InteractionKind,
    ) {
        self.screenshots.push(screenshot.into());
        self.descriptions.push(description.into());
        self.cursor_positions.push(cursor);
        self.interactions.push(interaction);
    }

    pub fn len(&self) -> usize {
        self.screenshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screenshots.is_empty()
    }

    /// Finish the trace into a [`BrowseResult`].
    pub fn into_result(
        self,
        title: impl Into<String>,
        url: impl Into<String>,
        content_preview: impl Into<String>,
        timestamp: u64,
    ) -> BrowseResult {
        BrowseResult {
            title: title.into(),
            url: url.into(),
            screenshots: self.screenshots,
            descriptions: self.descriptions,
            cursor_positions: self.cursor_positions,
            interactions: self.interactions,
            content_preview: content_preview.into(),
            timestamp,
        }
    }
}

// ── Stream events ────────────────────────────────────────────────────────────

/// One SSE `data:` payload on `/api/chat/stream`.
///
/// The wire shapes are fixed by the front end:
/// - `{"status": "started"}` / `{"status": "completed", ...}` /
///   `{"status": "error", ...}`
/// - `{"type": "agent_path", ...}` / `{"type": "visual_data", ...}`
/// - `{"token": "...", "agent_used": "..."}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StreamEvent {
    Status(StatusEvent),
    Payload(PayloadEvent),
    Token(TokenEvent),
}

/// Lifecycle events, tagged by `status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StatusEvent {
    Started,
    Completed {
        enable_input: bool,
    },
    Error {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        enable_input: Option<bool>,
    },
}

/// Data events, tagged by `type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PayloadEvent {
    AgentPath {
        path: String,
        full_path: Vec<String>,
    },
    VisualData {
        screenshots: Vec<String>,
        descriptions: Vec<String>,
        cursor_positions: Vec<Option<CursorPosition>>,
        interactions: Vec<InteractionKind>,
    },
}

/// One simulated response token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenEvent {
    pub token: String,
    pub agent_used: String,
}

impl StreamEvent {
    pub fn started() -> Self {
        Self::Status(StatusEvent::Started)
    }

    /// Path event for a single handling persona.
    pub fn agent_path(agent_name: impl Into<String>) -> Self {
        let name = agent_name.into();
        Self::Payload(PayloadEvent::AgentPath {
            path: name.clone(),
            full_path: vec![name],
        })
    }

    /// Visual-data event carrying the step trace of a browse result.
    pub fn visual_data(result: &BrowseResult) -> Self {
        Self::Payload(PayloadEvent::VisualData {
            screenshots: result.screenshots.clone(),
            descriptions: result.descriptions.clone(),
            cursor_positions: result.cursor_positions.clone(),
            interactions: result.interactions.clone(),
        })
    }

    pub fn token(token: impl Into<String>, agent_used: impl Into<String>) -> Self {
        Self::Token(TokenEvent {
            token: token.into(),
            agent_used: agent_used.into(),
        })
    }

    pub fn completed() -> Self {
        Self::Status(StatusEvent::Completed { enable_input: true })
    }

    pub fn error(message: impl Into<String>, enable_input: bool) -> Self {
        Self::Status(StatusEvent::Error {
            message: message.into(),
            enable_input: enable_input.then_some(true),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample_trace() -> StepTrace {
        let mut trace = StepTrace::new();
        trace.push(
            "screenshots/visual_1700000000/step_0_1700000000.png",
            "Initial page load of https://example.com",
            None,
            InteractionKind::PageLoad,
        );
        trace.push(
            "screenshots/visual_1700000000/scroll_1_1700000000.png",
            "Scrolling down to explore content (step 1)",
            Some(CursorPosition { x: 640.0, y: 300.0 }),
            InteractionKind::Scroll,
        );
        trace
    }

    #[test]
    fn step_trace_stays_aligned() {
        let trace = sample_trace();
        assert_eq!(trace.len(), 2);
        let result = trace.into_result("Example", "https://example.com", "Example body", 1_700_000_000);
        assert!(result.is_aligned());
        assert_eq!(result.step_count(), 2);
    }

    #[test]
    fn interaction_kinds_serialize_snake_case() {
        for (kind, expected) in [
            (InteractionKind::PageLoad, "\"page_load\""),
            (InteractionKind::ScrollToElement, "\"scroll_to_element\""),
            (InteractionKind::HoverLink, "\"hover_link\""),
            (InteractionKind::ClickInput, "\"click_input\""),
            (InteractionKind::PreClick, "\"pre_click\""),
            (InteractionKind::FinalView, "\"final_view\""),
        ] {
            assert_eq!(serde_json::to_string(&kind).unwrap(), expected);
            assert_eq!(format!("\"{kind}\""), expected);
        }
    }

    #[test]
    fn browse_result_round_trips() {
        let result = sample_trace().into_result("Example", "https://example.com", "…", 1_700_000_000);
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["cursor_positions"][0], serde_json::Value::Null);
        assert_eq!(value["cursor_positions"][1], json!({"x": 640.0, "y": 300.0}));
        assert_eq!(value["interactions"], json!(["page_load", "scroll"]));

        let back: BrowseResult = serde_json::from_value(value).unwrap();
        assert!(back.is_aligned());
    }

    #[test]
    fn started_event_shape() {
        let value = serde_json::to_value(StreamEvent::started()).unwrap();
        assert_eq!(value, json!({"status": "started"}));
    }

    #[test]
    fn agent_path_event_shape() {
        let value = serde_json::to_value(StreamEvent::agent_path("Web Browsing Agent")).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "agent_path",
                "path": "Web Browsing Agent",
                "full_path": ["Web Browsing Agent"],
            })
        );
    }

    #[test]
    fn visual_data_event_shape() {
        let result = sample_trace().into_result("Example", "https://example.com", "…", 1_700_000_000);
        let value = serde_json::to_value(StreamEvent::visual_data(&result)).unwrap();
        assert_eq!(value["type"], "visual_data");
        assert_eq!(value["screenshots"].as_array().unwrap().len(), 2);
        assert_eq!(value["descriptions"].as_array().unwrap().len(), 2);
        assert_eq!(value["cursor_positions"].as_array().unwrap().len(), 2);
        assert_eq!(value["interactions"], json!(["page_load", "scroll"]));
        // Title and preview stay out of the visual event.
        assert!(value.get("title").is_none());
    }

    #[test]
    fn token_event_shape() {
        let value = serde_json::to_value(StreamEvent::token(" visual", "Web Browsing Agent")).unwrap();
        assert_eq!(
            value,
            json!({"token": " visual", "agent_used": "Web Browsing Agent"})
        );
    }

    #[test]
    fn completed_event_shape() {
        let value = serde_json::to_value(StreamEvent::completed()).unwrap();
        assert_eq!(value, json!({"status": "completed", "enable_input": true}));
    }

    #[test]
    fn error_event_shapes() {
        let with_input = serde_json::to_value(StreamEvent::error("boom", true)).unwrap();
        assert_eq!(
            with_input,
            json!({"status": "error", "message": "boom", "enable_input": true})
        );

        // The missing-message error carries no enable_input flag.
        let bare = serde_json::to_value(StreamEvent::error("No message found", false)).unwrap();
        assert_eq!(bare, json!({"status": "error", "message": "No message found"}));
    }

    #[test]
    fn browse_request_defaults_missing_url() {
        let request: BrowseRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.url, DEFAULT_BROWSE_URL);

        let explicit: BrowseRequest =
            serde_json::from_value(json!({"url": "https://docs.rs"})).unwrap();
        assert_eq!(explicit.url, "https://docs.rs");
    }

    #[test]
    fn health_status_shape() {
        let value = serde_json::to_value(HealthStatus::healthy()).unwrap();
        assert_eq!(value, json!({"status": "healthy"}));
        assert!(HealthStatus::healthy().is_healthy());
        assert!(!HealthStatus { status: "down".into() }.is_healthy());
    }

    #[test]
    fn browse_failure_shape() {
        let failure = BrowseFailure {
            error: "Error browsing website: nav timeout".into(),
            url: "https://example.com".into(),
        };
        let value = serde_json::to_value(&failure).unwrap();
        assert_eq!(
            value,
            json!({"error": "Error browsing website: nav timeout", "url": "https://example.com"})
        );
    }
}
