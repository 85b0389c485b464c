//! Simulated token streaming over SSE.
//!
//! `POST /api/chat/stream` parks the message; the subsequent GET opens the
//! event stream. A spawned generator task produces events into a bounded
//! channel while the handler drains it, so slow consumers apply backpressure
//! to the producer instead of buffering the whole reply.

use {
    std::{convert::Infallible, time::Duration},
    axum::{
        Json,
        extract::State,
        response::sse::{Event, Sse},
    },
    futures::stream::{self, Stream, StreamExt},
    glimpse_protocol::StreamEvent,
    glimpse_routing::resolve_route,
    serde::Deserialize,
    tokio::sync::mpsc,
    tokio_stream::wrappers::ReceiverStream,
    tracing::warn,
    crate::{respond::compose_reply, state::AppState},
};

const STREAM_CHANNEL_CAPACITY: usize = 32;

#[derive(Debug, Deserialize)]
pub struct StreamMessage {
    #[serde(default)]
    pub message: String,
}

/// Parks the message for the next stream GET.
pub async fn stream_post_handler(
    State(state): State<AppState>,
    Json(request): Json<StreamMessage>,
) -> Json<serde_json::Value> {
    let mut pending = state.pending_message.lock().await;
    *pending = Some(request.message);
    Json(serde_json::json!({"status": "message_received"}))
}

/// Opens the SSE stream and replays the generated events.
///
/// The pending message is consumed here, so a second GET without a new POST
/// streams the "No message found" error.
pub async fn stream_get_handler(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let message = state.pending_message.lock().await.take();
    let (tx, rx) = mpsc::channel(STREAM_CHANNEL_CAPACITY);
    tokio::spawn(run_generator(state, message, tx));

    let events = ReceiverStream::new(rx)
        .map(|event| Ok(frame(&event)))
        .chain(stream::once(async { Ok(close_frame()) }));
    Sse::new(events)
}

/// Produces the event sequence for one stream.
///
/// Send failures mean the client went away, so the generator just stops.
async fn run_generator(state: AppState, message: Option<String>, tx: mpsc::Sender<StreamEvent>) {
    if tx.send(StreamEvent::started()).await.is_err() {
        return;
    }

    // An empty message counts as missing, like no POST at all.
    let Some(message) = message.filter(|m| !m.is_empty()) else {
        warn!("stream opened with no pending message");
        let _ = tx.send(StreamEvent::error("No message found", false)).await;
        return;
    };

    let route = match resolve_route(&state.catalog, &message) {
        Ok(route) => route,
        Err(error) => {
            let _ = tx
                .send(StreamEvent::error(
                    format!("Error processing request: {error}"),
                    true,
                ))
                .await;
            return;
        },
    };
    let agent_name = route.handler_name(&state.catalog).to_owned();

    if tx
        .send(StreamEvent::agent_path(agent_name.as_str()))
        .await
        .is_err()
    {
        return;
    }

    let reply = compose_reply(state.browser.as_ref(), route.intent, &message).await;
    if let Some(visual) = &reply.visual {
        if tx.send(StreamEvent::visual_data(visual)).await.is_err() {
            return;
        }
    }

    let delay = Duration::from_millis(state.config.stream.token_delay_ms);
    for token in tokenize(&reply.text) {
        if tx
            .send(StreamEvent::token(token, agent_name.as_str()))
            .await
            .is_err()
        {
            return;
        }
        tokio::time::sleep(delay).await;
    }

    let _ = tx.send(StreamEvent::completed()).await;
}

fn frame(event: &StreamEvent) -> Event {
    let payload = serde_json::to_string(event).unwrap_or_else(|_| "{}".to_owned());
    Event::default().data(payload)
}

fn close_frame() -> Event {
    Event::default().event("close").data("{}")
}

/// Splits a reply into streamable tokens.
///
/// Every word after the first is sent with a leading space, except where the
/// word already starts on a new line and the break itself separates it.
fn tokenize(response: &str) -> Vec<String> {
    response
        .split(' ')
        .enumerate()
        .map(|(index, word)| {
            if index == 0 || word.starts_with('\n') {
                word.to_owned()
            } else {
                format!(" {word}")
            }
        })
        .collect()
}
