use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use tracing::error;

use shared_models::error::AppError;

use crate::models::DoctorError;
use crate::services::AvailabilityService;

impl From<DoctorError> for AppError {
    fn from(err: DoctorError) -> Self {
        match err {
            DoctorError::DepartmentNotFound(code) => {
                AppError::NotFound(format!("Department not found: {}", code))
            }
            DoctorError::Database(e) => {
                error!("Roster query failed: {}", e);
                AppError::Database("Roster lookup failed".to_string())
            }
        }
    }
}

#[axum::debug_handler]
pub async fn list_departments(
    State(service): State<Arc<AvailabilityService>>,
) -> Result<Json<Value>, AppError> {
    let departments = service.roster().list_departments()?;

    Ok(Json(json!({
        "departments": departments,
        "total": departments.len()
    })))
}

#[axum::debug_handler]
pub async fn get_department_availability(
    State(service): State<Arc<AvailabilityService>>,
    Path(department_code): Path<String>,
) -> Result<Json<Value>, AppError> {
    let department = service.roster().department(&department_code)?;
    let availability = service.availability(&department.code)?;

    Ok(Json(json!({
        "department": department,
        "availability": availability
    })))
}
