use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde_json::{json, Value};
use tracing::{debug, error, warn};

use shared_models::error::AppError;

use crate::models::{BookingError, BookingRequest};
use crate::services::BookingService;

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::MissingFields => AppError::ValidationError(err.to_string()),
            BookingError::DoctorNotFound => AppError::NotFound(err.to_string()),
            BookingError::InvalidSlot => AppError::BadRequest(err.to_string()),
            BookingError::SlotNoLongerAvailable => AppError::Conflict(err.to_string()),
            BookingError::IdsExhausted(_) => {
                error!("Booking id generation failed: {}", err);
                AppError::Internal("Randevu kaydedilemedi.".to_string())
            }
            BookingError::Database(e) => {
                error!("Booking storage failure: {}", e);
                AppError::Database("Randevu kaydedilemedi.".to_string())
            }
        }
    }
}

#[axum::debug_handler]
pub async fn book_appointment(
    State(service): State<Arc<BookingService>>,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    // An unreadable body is treated as an empty request.
    let request = payload.map(|Json(request)| request).unwrap_or_else(|rejection| {
        debug!("Unreadable booking body: {}", rejection);
        BookingRequest::default()
    });
    let request = request.validate()?;
    let department_code = request.department_code.clone();

    let appointment = service.book(request)?;

    // The appointment is committed; a failed refresh must not turn it into an error.
    let availability = match service.availability(&department_code) {
        Ok(rows) => Some(rows),
        Err(e) => {
            warn!("Availability refresh failed after booking {}: {}", appointment.id, e);
            None
        }
    };

    let message = format!(
        "Randevu oluşturuldu: {} – {} (Kod: {})",
        appointment.doctor, appointment.slot, appointment.id
    );

    Ok(Json(json!({
        "ok": true,
        "message": message,
        "appointment": appointment,
        "availability": availability
    })))
}
