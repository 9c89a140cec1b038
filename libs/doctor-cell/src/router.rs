use std::sync::Arc;

use axum::{routing::get, Router};

use crate::handlers;
use crate::services::AvailabilityService;

pub fn doctor_routes(service: Arc<AvailabilityService>) -> Router {
    Router::new()
        .route("/departments", get(handlers::list_departments))
        .route("/availability/{department_code}", get(handlers::get_department_availability))
        .with_state(service)
}
