use std::sync::Arc;

use axum::{routing::post, Router};

use crate::handlers;
use crate::services::ChatOrchestrator;

pub fn chat_routes(orchestrator: Arc<ChatOrchestrator>) -> Router {
    Router::new()
        .route("/chat", post(handlers::chat))
        .with_state(orchestrator)
}
