use std::sync::Arc;

use axum::{routing::post, Router};

use crate::handlers;
use crate::services::BookingService;

pub fn appointment_routes(service: Arc<BookingService>) -> Router {
    Router::new()
        .route("/book", post(handlers::book_appointment))
        .with_state(service)
}
