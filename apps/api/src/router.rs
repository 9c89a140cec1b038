use std::sync::Arc;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

use appointment_cell::router::appointment_routes;
use appointment_cell::BookingService;
use chat_cell::router::chat_routes;
use chat_cell::ChatOrchestrator;
use doctor_cell::router::doctor_routes;
use doctor_cell::AvailabilityService;
use triage_cell::router::triage_routes;

/// Services shared by the cell routers.
#[derive(Clone)]
pub struct AppServices {
    pub availability: Arc<AvailabilityService>,
    pub booking: Arc<BookingService>,
    pub chat: Arc<ChatOrchestrator>,
}

async fn root() -> Json<Value> {
    Json(json!({
        "ok": true,
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn health() -> Json<Value> {
    Json(json!({ "ok": true, "version": env!("CARGO_PKG_VERSION") }))
}

pub fn create_router(services: AppServices) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(chat_routes(services.chat))
        .merge(appointment_routes(services.booking))
        .merge(doctor_routes(services.availability))
        .merge(triage_routes())
}
