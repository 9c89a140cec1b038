use axum::{routing::get, Router};

use crate::handlers;

pub fn triage_routes() -> Router {
    Router::new().route("/classify", get(handlers::classify_text))
}
