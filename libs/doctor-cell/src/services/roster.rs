use std::sync::Arc;

use rusqlite::{params, OptionalExtension};
use tracing::debug;

use shared_database::Database;
use shared_models::DepartmentRef;

use crate::models::{Doctor, DoctorError};

/// Read-only access to the seeded departments and doctors.
#[derive(Clone)]
pub struct RosterService {
    db: Arc<Database>,
}

impl RosterService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn list_departments(&self) -> Result<Vec<DepartmentRef>, DoctorError> {
        let conn = self.db.conn()?;
        let mut stmt = conn.prepare("SELECT code, name FROM departments ORDER BY code")?;
        let departments = stmt
            .query_map([], |row| {
                Ok(DepartmentRef {
                    code: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(departments)
    }

    pub fn department(&self, code: &str) -> Result<DepartmentRef, DoctorError> {
        let conn = self.db.conn()?;
        conn.query_row(
            "SELECT code, name FROM departments WHERE code = ?1",
            params![code],
            |row| {
                Ok(DepartmentRef {
                    code: row.get(0)?,
                    name: row.get(1)?,
                })
            },
        )
        .optional()?
        .ok_or_else(|| DoctorError::DepartmentNotFound(code.to_string()))
    }

    /// Doctors of a department in stable name order.
    pub fn list_doctors(&self, department_code: &str) -> Result<Vec<Doctor>, DoctorError> {
        debug!("Listing doctors for department: {}", department_code);

        let conn = self.db.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, dept_code, name FROM doctors WHERE dept_code = ?1 ORDER BY name",
        )?;
        let doctors = stmt
            .query_map(params![department_code], |row| {
                Ok(Doctor {
                    id: row.get(0)?,
                    department_code: row.get(1)?,
                    name: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(doctors)
    }

    pub fn has_doctor(&self, department_code: &str, doctor_name: &str) -> Result<bool, DoctorError> {
        let conn = self.db.conn()?;
        let found: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM doctors WHERE dept_code = ?1 AND name = ?2",
                params![department_code, doctor_name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }
}
