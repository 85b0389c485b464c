//! Non-streaming chat endpoint.

use {
    axum::{Json, extract::State, http::StatusCode},
    glimpse_routing::resolve_route,
    serde::Deserialize,
    tracing::info,
    crate::{respond::compose_reply, state::AppState},
};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

/// `POST /api/chat`: classify the message, compose the reply, answer in one
/// shot. The delegation chain rides along so the front end can render it.
pub async fn chat_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let route = resolve_route(&state.catalog, &request.message)
        .map_err(|error| (StatusCode::INTERNAL_SERVER_ERROR, error.to_string()))?;

    let full_path = route.path_names(&state.catalog);
    let agent_used = route.handler_name(&state.catalog).to_owned();
    let agent_path = if full_path.len() > 1 {
        full_path.join(" → ")
    } else {
        agent_used.clone()
    };
    info!(intent = ?route.intent, agent = %agent_used, "handling chat message");

    let reply = compose_reply(state.browser.as_ref(), route.intent, &request.message).await;

    Ok(Json(serde_json::json!({
        "response": reply.text,
        "agent_used": agent_used,
        "agent_path": agent_path,
        "full_path": full_path,
    })))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use {
        std::sync::Arc,
        glimpse_config::GlimpseConfig,
        super::*,
        crate::browse::NoopBrowser,
    };

    fn test_state() -> AppState {
        AppState::with_browser(GlimpseConfig::default(), Arc::new(NoopBrowser)).unwrap()
    }

    #[tokio::test]
    async fn general_questions_report_the_delegation_chain() {
        let request = ChatRequest {
            message: "what is the capital of France?".to_owned(),
        };

        let Json(body) = chat_handler(State(test_state()), Json(request))
            .await
            .unwrap();

        assert_eq!(body["agent_used"], "Web Search Agent");
        assert_eq!(body["agent_path"], "Admin Agent → Web Search Agent");
        assert_eq!(
            body["full_path"],
            serde_json::json!(["Admin Agent", "Web Search Agent"])
        );
        assert!(
            body["response"]
                .as_str()
                .unwrap()
                .contains("'what is the capital of France?'")
        );
    }

    #[tokio::test]
    async fn visual_intents_ride_the_three_hop_chain() {
        let request = ChatRequest {
            message: "find me a flight to SFO".to_owned(),
        };

        let Json(body) = chat_handler(State(test_state()), Json(request))
            .await
            .unwrap();

        assert_eq!(body["agent_used"], "Web Browsing Agent");
        assert_eq!(
            body["agent_path"],
            "Admin Agent → Web Search Agent → Web Browsing Agent"
        );
        assert!(
            body["response"]
                .as_str()
                .unwrap()
                .starts_with("I'll help you find flights")
        );
    }
}
