use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_database::DbError;

/// A booked slot. Created once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub department_code: String,
    pub doctor: String,
    pub slot: String,
    pub patient: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DepartmentCode {
    pub code: Option<String>,
}

/// Raw booking payload; every field is optional so that missing fields can
/// be reported as a validation error instead of a decode failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingRequest {
    #[serde(default)]
    pub department: Option<DepartmentCode>,
    #[serde(default)]
    pub doctor: Option<String>,
    #[serde(default)]
    pub slot: Option<String>,
    #[serde(default)]
    pub patient: Option<String>,
}

/// Booking payload after field presence checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAppointment {
    pub department_code: String,
    pub doctor: String,
    pub slot: String,
    pub patient: Option<String>,
}

impl BookingRequest {
    pub fn validate(self) -> Result<NewAppointment, BookingError> {
        let department_code = self
            .department
            .and_then(|d| d.code)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        let doctor = self.doctor.map(|d| d.trim().to_string()).filter(|d| !d.is_empty());
        let slot = self.slot.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());

        match (department_code, doctor, slot) {
            (Some(department_code), Some(doctor), Some(slot)) => Ok(NewAppointment {
                department_code,
                doctor,
                slot,
                patient: self
                    .patient
                    .map(|p| p.trim().to_string())
                    .filter(|p| !p.is_empty()),
            }),
            _ => Err(BookingError::MissingFields),
        }
    }
}

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Eksik bilgi (department/doctor/slot).")]
    MissingFields,

    #[error("Doktor departmanda bulunamadı.")]
    DoctorNotFound,

    #[error("Geçersiz saat.")]
    InvalidSlot,

    #[error("Slot artık uygun değil.")]
    SlotNoLongerAvailable,

    #[error("No free appointment id after {0} attempts")]
    IdsExhausted(usize),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

impl From<rusqlite::Error> for BookingError {
    fn from(err: rusqlite::Error) -> Self {
        BookingError::Database(DbError::Sqlite(err))
    }
}

impl From<doctor_cell::DoctorError> for BookingError {
    fn from(err: doctor_cell::DoctorError) -> Self {
        match err {
            doctor_cell::DoctorError::DepartmentNotFound(_) => BookingError::DoctorNotFound,
            doctor_cell::DoctorError::Database(e) => BookingError::Database(e),
        }
    }
}
