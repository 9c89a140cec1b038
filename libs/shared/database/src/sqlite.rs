use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection};
use thiserror::Error;
use tracing::{debug, info};

use shared_models::{Department, DoctorSeed};

use crate::schema::SCHEMA;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database lock poisoned")]
    LockPoisoned,
}

pub type DbResult<T> = Result<T, DbError>;

/// Shared SQLite handle.
///
/// A single connection guarded by a mutex; callers share it through `Arc`.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open database at path, creating the file and its parent directory if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        debug!("Opening SQLite database at {}", path.display());
        Self::from_connection(Connection::open(path)?)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> DbResult<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Lock the connection for a short unit of work.
    pub fn conn(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| DbError::LockPoisoned)
    }

    /// Insert departments and doctors when their tables are still empty.
    pub fn seed_reference_data(
        &self,
        departments: &[Department],
        roster: &[DoctorSeed],
    ) -> DbResult<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let department_count: i64 =
            tx.query_row("SELECT COUNT(*) FROM departments", [], |row| row.get(0))?;
        if department_count == 0 {
            let mut stmt = tx.prepare("INSERT INTO departments (code, name) VALUES (?1, ?2)")?;
            for department in departments {
                stmt.execute(params![department.code, department.name])?;
            }
            info!("Seeded {} departments", departments.len());
        }

        let doctor_count: i64 =
            tx.query_row("SELECT COUNT(*) FROM doctors", [], |row| row.get(0))?;
        if doctor_count == 0 {
            let mut stmt =
                tx.prepare("INSERT INTO doctors (id, dept_code, name) VALUES (?1, ?2, ?3)")?;
            for doctor in roster {
                stmt.execute(params![doctor.id, doctor.department_code, doctor.name])?;
            }
            info!("Seeded {} doctors", roster.len());
        }

        tx.commit()?;
        Ok(())
    }
}
