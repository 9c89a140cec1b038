use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_database::DbError;

/// Format of every bookable slot label.
pub const SLOT_LABEL_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: String,
    pub department_code: String,
    pub name: String,
}

/// Free slots for one doctor, in chronological order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityRow {
    pub doctor: String,
    pub slots: Vec<String>,
}

#[derive(Error, Debug)]
pub enum DoctorError {
    #[error("Department not found: {0}")]
    DepartmentNotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

impl From<rusqlite::Error> for DoctorError {
    fn from(err: rusqlite::Error) -> Self {
        DoctorError::Database(DbError::Sqlite(err))
    }
}
