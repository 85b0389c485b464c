//! The walkthrough choreography.
//!
//! Every browse request replays the same fixed script: capture the loaded
//! page, scroll down three times, return to the top, then visit a capped set
//! of interactive elements. Each element is scrolled into view and hovered;
//! text-like inputs get clicked, cleared, and typed into; the last link or
//! button gets clicked. Every step appends one screenshot, one description,
//! one cursor position, and one interaction tag to the trace.
//!
//! Per-element failures are logged and skipped so a stale element never
//! fails the request.

use std::time::Duration;

use {
    chromiumoxide::{
        Page,
        cdp::browser_protocol::{
            input::{
                DispatchKeyEventParams, DispatchKeyEventType, DispatchMouseEventParams,
                DispatchMouseEventType, MouseButton,
            },
            page::CaptureScreenshotFormat,
        },
        page::ScreenshotParams,
    },
    serde::Deserialize,
    tracing::{debug, info, warn},
};

use glimpse_protocol::{BrowseResult, CursorPosition, InteractionKind, StepTrace};

use crate::{artifacts::RunArtifacts, error::BrowserError};

const SCROLL_STEPS: u32 = 3;
const SCROLL_PAUSE: Duration = Duration::from_secs(1);
const HOVER_PAUSE: Duration = Duration::from_millis(500);
const CLICK_PAUSE: Duration = Duration::from_millis(300);
const KEY_PAUSE: Duration = Duration::from_millis(100);
const POST_CLICK_PAUSE: Duration = Duration::from_secs(2);

const ELEMENT_TEXT_LIMIT: usize = 30;
const BODY_TEXT_LIMIT: usize = 5000;
const PREVIEW_LIMIT: usize = 500;

/// Red dot pinned to the pointer so captures show where the mouse is.
const CURSOR_OVERLAY_JS: &str = r#"
(() => {
    const cursor = document.createElement('div');
    cursor.id = 'glimpse-mouse-cursor';
    cursor.style.position = 'absolute';
    cursor.style.width = '20px';
    cursor.style.height = '20px';
    cursor.style.borderRadius = '10px';
    cursor.style.backgroundColor = 'rgba(255, 0, 0, 0.5)';
    cursor.style.zIndex = '9999';
    cursor.style.pointerEvents = 'none';
    document.body.appendChild(cursor);

    window.addEventListener('mousemove', (e) => {
        cursor.style.left = e.clientX + 'px';
        cursor.style.top = e.clientY + 'px';
    });
    return true;
})()
"#;

/// Pick the elements the walkthrough will visit: the first 5 visible of the
/// first 20 links, 3 of 10 buttons, 3 of 10 inputs, capped at 8 total. Each
/// picked element is tagged with a `data-glimpse-ref` for later lookup.
const DISCOVER_ELEMENTS_JS: &str = r#"
(() => {
    function isVisible(el) {
        const rect = el.getBoundingClientRect();
        const style = getComputedStyle(el);
        return (
            rect.width > 0 &&
            rect.height > 0 &&
            style.visibility !== 'hidden' &&
            style.display !== 'none'
        );
    }

    const links = Array.from(document.getElementsByTagName('a'))
        .slice(0, 20).filter(isVisible).slice(0, 5);
    const buttons = Array.from(document.getElementsByTagName('button'))
        .slice(0, 10).filter(isVisible).slice(0, 3);
    const inputs = Array.from(document.getElementsByTagName('input'))
        .slice(0, 10).filter(isVisible).slice(0, 3);

    const picked = [...links, ...buttons, ...inputs].slice(0, 8);
    const results = [];
    let ref = 1;
    for (const el of picked) {
        el.dataset.glimpseRef = ref.toString();
        results.push({
            ref_: ref,
            tag: el.tagName.toLowerCase(),
            text: (el.innerText || el.textContent || '').trim(),
            type: el.getAttribute('type') || '',
            name: el.getAttribute('name') || '',
            disabled: el.disabled === true
        });
        ref += 1;
    }
    return results;
})()
"#;

const SCROLL_TOP_JS: &str = "window.scrollTo({ top: 0, behavior: 'smooth' }); true";

const BODY_TEXT_JS: &str = "document.body ? document.body.innerText : ''";

/// One element picked by [`DISCOVER_ELEMENTS_JS`].
#[derive(Debug, Clone, Deserialize)]
struct DiscoveredElement {
    ref_: u32,
    tag: String,
    text: String,
    #[serde(rename = "type")]
    input_type: String,
    name: String,
    disabled: bool,
}

/// Drive the full choreography against an already-navigated page.
pub async fn record_walkthrough(
    page: &Page,
    url: &str,
    run: &RunArtifacts,
) -> Result<BrowseResult, BrowserError> {
    let ts = run.timestamp();
    let mut trace = StepTrace::new();

    if let Err(e) = eval::<bool>(page, CURSOR_OVERLAY_JS).await {
        warn!(error = %e, "cursor overlay injection failed");
    }

    let shot = capture(page).await?;
    let rel = run.save(&format!("step_0_{ts}.png"), &shot).await?;
    trace.push(
        rel,
        format!("Initial page load of {url}"),
        None,
        InteractionKind::PageLoad,
    );

    let elements = match eval::<Vec<DiscoveredElement>>(page, DISCOVER_ELEMENTS_JS).await {
        Ok(elements) => elements,
        Err(e) => {
            warn!(error = %e, "element discovery failed");
            Vec::new()
        },
    };
    debug!(elements = elements.len(), "discovered interactive elements");

    for step in 1..=SCROLL_STEPS {
        let js = format!(
            "window.scrollTo({{ top: {}, behavior: 'smooth' }}); true",
            step * 300
        );
        if let Err(e) = eval::<bool>(page, &js).await {
            warn!(step, error = %e, "page scroll failed");
        }
        tokio::time::sleep(SCROLL_PAUSE).await;

        let shot = capture(page).await?;
        let rel = run.save(&format!("scroll_{step}_{ts}.png"), &shot).await?;
        trace.push(
            rel,
            format!("Scrolling down to explore content (step {step})"),
            Some(scroll_cursor(step)),
            InteractionKind::Scroll,
        );
    }

    if let Err(e) = eval::<bool>(page, SCROLL_TOP_JS).await {
        warn!(error = %e, "scroll back to top failed");
    }
    tokio::time::sleep(SCROLL_PAUSE).await;

    let last = elements.len().saturating_sub(1);
    for (idx, element) in elements.iter().enumerate() {
        let step_no = idx + 1;
        let is_last = idx == last;
        if let Err(e) =
            interact_with_element(page, run, &mut trace, element, step_no, is_last).await
        {
            warn!(
                step = step_no,
                tag = element.tag,
                error = %e,
                "element interaction failed, skipping"
            );
        }
    }

    let shot = capture(page).await?;
    let rel = run.save(&format!("step_final_{ts}.png"), &shot).await?;
    trace.push(rel, "Final view of the page", None, InteractionKind::FinalView);

    let title = page
        .get_title()
        .await
        .map_err(|e| BrowserError::Cdp(e.to_string()))?
        .unwrap_or_default();
    let body: String = eval(page, BODY_TEXT_JS).await.unwrap_or_default();
    let body = truncate_chars(&body, BODY_TEXT_LIMIT, "... [content truncated]");
    let preview = truncate_chars(&body, PREVIEW_LIMIT, "...");

    info!(url, steps = trace.len(), "walkthrough recorded");
    Ok(trace.into_result(title, url, preview, ts))
}

/// Visit one element: scroll to it, hover, and interact per its kind. Any
/// error here is caught by the caller and skips only this element.
async fn interact_with_element(
    page: &Page,
    run: &RunArtifacts,
    trace: &mut StepTrace,
    element: &DiscoveredElement,
    step_no: usize,
    is_last: bool,
) -> Result<(), BrowserError> {
    let ts = run.timestamp();

    // Element may have vanished or hidden itself since discovery.
    let in_view: bool = eval(page, &element_into_view_js(element.ref_)).await?;
    if !in_view {
        debug!(step = step_no, tag = element.tag, "element no longer visible");
        return Ok(());
    }
    tokio::time::sleep(SCROLL_PAUSE).await;

    let Some(center) = eval::<Option<CursorPosition>>(page, &element_center_js(element.ref_))
        .await?
    else {
        debug!(step = step_no, tag = element.tag, "element center unavailable");
        return Ok(());
    };

    let text = truncate_chars(&element.text, ELEMENT_TEXT_LIMIT, "");
    let shot = capture(page).await?;
    let rel = run.save(&format!("step_{step_no}_scroll_{ts}.png"), &shot).await?;
    trace.push(
        rel,
        scroll_description(&element.tag, &text, &element.input_type),
        Some(center),
        InteractionKind::ScrollToElement,
    );

    move_pointer(page, center).await?;
    tokio::time::sleep(HOVER_PAUSE).await;
    let shot = capture(page).await?;
    let rel = run.save(&format!("step_{step_no}_hover_{ts}.png"), &shot).await?;
    let (description, kind) = hover_step(&element.tag, &text, &element.input_type);
    trace.push(rel, description, Some(center), kind);

    if element.tag == "input" && !element.disabled && is_typable(&element.input_type) {
        click_at(page, center).await?;
        tokio::time::sleep(CLICK_PAUSE).await;
        let shot = capture(page).await?;
        let rel = run.save(&format!("step_{step_no}_click_{ts}.png"), &shot).await?;
        trace.push(
            rel,
            format!("Clicked on {} field", element.input_type),
            Some(center),
            InteractionKind::ClickInput,
        );

        let _: bool = eval(page, &clear_value_js(element.ref_)).await?;
        tokio::time::sleep(CLICK_PAUSE).await;

        let sample = sample_text_for(&element.input_type, &element.name);
        type_chars(page, sample).await?;
        let shot = capture(page).await?;
        let rel = run.save(&format!("step_{step_no}_typing_{ts}.png"), &shot).await?;
        trace.push(
            rel,
            format!("Typing in {}: '{}'", element.input_type, sample),
            Some(center),
            InteractionKind::Typing,
        );
    } else if is_last && matches!(element.tag.as_str(), "a" | "button") {
        let shot = capture(page).await?;
        let rel = run.save(&format!("step_{step_no}_pre_click_{ts}.png"), &shot).await?;
        trace.push(
            rel,
            format!("About to click {}: {}", element.tag, text),
            Some(center),
            InteractionKind::PreClick,
        );

        click_at(page, center).await?;
        tokio::time::sleep(POST_CLICK_PAUSE).await;
        let shot = capture(page).await?;
        let rel = run.save(&format!("step_{step_no}_post_click_{ts}.png"), &shot).await?;
        trace.push(
            rel,
            format!("After clicking {}: {}", element.tag, text),
            None,
            InteractionKind::PostClick,
        );
    }

    Ok(())
}

// ── CDP helpers ──────────────────────────────────────────────────────────────

async fn eval<T: serde::de::DeserializeOwned>(page: &Page, js: &str) -> Result<T, BrowserError> {
    page.evaluate(js)
        .await
        .map_err(|e| BrowserError::JsEvalFailed(e.to_string()))?
        .into_value()
        .map_err(|e| BrowserError::JsEvalFailed(format!("failed to get result: {e:?}")))
}

async fn capture(page: &Page) -> Result<Vec<u8>, BrowserError> {
    page.screenshot(
        ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .build(),
    )
    .await
    .map_err(|e| BrowserError::ScreenshotFailed(e.to_string()))
}

async fn move_pointer(page: &Page, to: CursorPosition) -> Result<(), BrowserError> {
    let cmd = DispatchMouseEventParams::builder()
        .r#type(DispatchMouseEventType::MouseMoved)
        .x(to.x)
        .y(to.y)
        .build()
        .map_err(BrowserError::Cdp)?;
    page.execute(cmd)
        .await
        .map_err(|e| BrowserError::Cdp(e.to_string()))?;
    Ok(())
}

async fn click_at(page: &Page, at: CursorPosition) -> Result<(), BrowserError> {
    for kind in [
        DispatchMouseEventType::MousePressed,
        DispatchMouseEventType::MouseReleased,
    ] {
        let cmd = DispatchMouseEventParams::builder()
            .r#type(kind)
            .x(at.x)
            .y(at.y)
            .button(MouseButton::Left)
            .click_count(1)
            .build()
            .map_err(BrowserError::Cdp)?;
        page.execute(cmd)
            .await
            .map_err(|e| BrowserError::Cdp(e.to_string()))?;
    }
    Ok(())
}

async fn type_chars(page: &Page, text: &str) -> Result<(), BrowserError> {
    for c in text.chars() {
        for kind in [DispatchKeyEventType::KeyDown, DispatchKeyEventType::KeyUp] {
            let cmd = DispatchKeyEventParams::builder()
                .r#type(kind)
                .text(c.to_string())
                .build()
                .map_err(BrowserError::Cdp)?;
            page.execute(cmd)
                .await
                .map_err(|e| BrowserError::Cdp(e.to_string()))?;
        }
        tokio::time::sleep(KEY_PAUSE).await;
    }
    Ok(())
}

// ── Per-element JS ───────────────────────────────────────────────────────────

fn element_into_view_js(ref_: u32) -> String {
    format!(
        r#"(() => {{
    const el = document.querySelector('[data-glimpse-ref="{ref_}"]');
    if (!el) return false;
    const rect = el.getBoundingClientRect();
    const style = getComputedStyle(el);
    const visible = rect.width > 0 && rect.height > 0 &&
        style.visibility !== 'hidden' && style.display !== 'none';
    if (!visible) return false;
    el.scrollIntoView({{ behavior: 'smooth', block: 'center' }});
    return true;
}})()"#
    )
}

fn element_center_js(ref_: u32) -> String {
    format!(
        r#"(() => {{
    const el = document.querySelector('[data-glimpse-ref="{ref_}"]');
    if (!el) return null;
    const rect = el.getBoundingClientRect();
    return {{ x: rect.left + rect.width / 2, y: rect.top + rect.height / 2 }};
}})()"#
    )
}

fn clear_value_js(ref_: u32) -> String {
    format!(
        r#"(() => {{
    const el = document.querySelector('[data-glimpse-ref="{ref_}"]');
    if (!el) return false;
    el.value = '';
    el.dispatchEvent(new Event('input', {{ bubbles: true }}));
    return true;
}})()"#
    )
}

// ── Step wording ─────────────────────────────────────────────────────────────

fn scroll_cursor(step: u32) -> CursorPosition {
    CursorPosition {
        x: 640.0,
        y: f64::from(300 + (step - 1) * 100),
    }
}

fn scroll_description(tag: &str, text: &str, input_type: &str) -> String {
    match tag {
        "a" => format!("Scrolled to link: {text}"),
        "button" => format!("Scrolled to button: {text}"),
        "input" => format!("Scrolled to input field of type: {input_type}"),
        _ => format!("Scrolled to {tag} element"),
    }
}

fn hover_step(tag: &str, text: &str, input_type: &str) -> (String, InteractionKind) {
    match tag {
        "a" => (
            format!("Hovering over link: {text}"),
            InteractionKind::HoverLink,
        ),
        "button" => (
            format!("Hovering over button: {text}"),
            InteractionKind::HoverButton,
        ),
        "input" => (
            format!("Hovering over input field of type: {input_type}"),
            InteractionKind::HoverInput,
        ),
        _ => (
            format!("Hovering over {tag} element"),
            InteractionKind::HoverElement,
        ),
    }
}

/// Only text-like inputs get the click/clear/type treatment.
fn is_typable(input_type: &str) -> bool {
    matches!(input_type, "text" | "search" | "email" | "password")
}

fn sample_text_for(input_type: &str, name: &str) -> &'static str {
    let ty = input_type.to_lowercase();
    if ty.contains("search") || name.to_lowercase().contains("search") {
        "search query example"
    } else if ty.contains("email") {
        "example@email.com"
    } else if ty.contains("password") {
        "••••••••"
    } else {
        "Sample text for demonstration"
    }
}

fn truncate_chars(text: &str, limit: usize, suffix: &str) -> String {
    if text.chars().count() > limit {
        let mut cut: String = text.chars().take(limit).collect();
        cut.push_str(suffix);
        cut
    } else {
        text.to_string()
    }
}
