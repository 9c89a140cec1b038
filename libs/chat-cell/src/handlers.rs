use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde_json::{json, Value};
use tracing::debug;

use crate::models::{ChatRequest, ReplySource};
use crate::services::{templates, ChatOrchestrator};

/// Chat turn. Always answers with 200; failures degrade to rule-based text.
#[axum::debug_handler]
pub async fn chat(
    State(orchestrator): State<Arc<ChatOrchestrator>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Json<Value> {
    // An unreadable body is treated as an empty message.
    let request = payload.map(|Json(request)| request).unwrap_or_else(|rejection| {
        debug!("Unreadable chat body: {}", rejection);
        ChatRequest::default()
    });
    let message = request.message.unwrap_or_default();
    let message = message.trim();

    if message.is_empty() {
        debug!("Empty chat message received");
        return Json(json!({
            "reply": templates::EMPTY_MESSAGE_REPLY,
            "intent": "empty",
            "source": ReplySource::RuleBased,
        }));
    }

    let reply = orchestrator.chat(message).await;
    Json(json!(reply))
}
