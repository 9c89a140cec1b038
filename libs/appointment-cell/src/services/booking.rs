use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use rusqlite::{params, ErrorCode};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use doctor_cell::services::AvailabilityService;
use doctor_cell::AvailabilityRow;
use serde_json::json;
use shared_database::Database;
use shared_models::{EventKind, EventLog, TracingEventLog};

use crate::models::{Appointment, BookingError, NewAppointment};

/// Fresh ids are retried this many times on a primary-key collision.
const MAX_ID_ATTEMPTS: usize = 3;

/// SQLite extended result codes for violated UNIQUE and PRIMARY KEY constraints.
const SQLITE_CONSTRAINT_UNIQUE: i32 = 2067;
const SQLITE_CONSTRAINT_PRIMARYKEY: i32 = 1555;

pub struct BookingService {
    db: Arc<Database>,
    availability: Arc<AvailabilityService>,
    events: Arc<dyn EventLog>,
    id_source: fn() -> String,
}

impl BookingService {
    pub fn new(db: Arc<Database>, availability: Arc<AvailabilityService>) -> Self {
        Self {
            db,
            availability,
            events: Arc::new(TracingEventLog),
            id_source: new_appointment_id,
        }
    }

    pub fn with_event_log(mut self, events: Arc<dyn EventLog>) -> Self {
        self.events = events;
        self
    }

    pub fn with_id_source(mut self, id_source: fn() -> String) -> Self {
        self.id_source = id_source;
        self
    }

    pub fn book(&self, request: NewAppointment) -> Result<Appointment, BookingError> {
        self.book_at(request, Local::now().naive_local())
    }

    /// Validate and insert an appointment.
    ///
    /// The `(doctor, slot)` uniqueness check is the insert itself: two callers
    /// racing for the same slot get one `Appointment` and one
    /// `SlotNoLongerAvailable`.
    pub fn book_at(
        &self,
        request: NewAppointment,
        now: NaiveDateTime,
    ) -> Result<Appointment, BookingError> {
        debug!(
            "Booking {} at {} in {}",
            request.doctor, request.slot, request.department_code
        );

        if !self
            .availability
            .roster()
            .has_doctor(&request.department_code, &request.doctor)?
        {
            return Err(BookingError::DoctorNotFound);
        }

        if !self.availability.calendar().contains_at(&request.slot, now) {
            return Err(BookingError::InvalidSlot);
        }

        let created_at = now.format("%Y-%m-%dT%H:%M:%S").to_string();

        for _ in 0..MAX_ID_ATTEMPTS {
            let appointment = Appointment {
                id: (self.id_source)(),
                department_code: request.department_code.clone(),
                doctor: request.doctor.clone(),
                slot: request.slot.clone(),
                patient: request.patient.clone(),
                created_at: created_at.clone(),
            };

            match self.insert(&appointment) {
                Ok(()) => {
                    info!(
                        "Appointment {} created for {} at {}",
                        appointment.id, appointment.doctor, appointment.slot
                    );
                    self.events.record(
                        EventKind::Book,
                        json!({
                            "dept": appointment.department_code,
                            "id": appointment.id,
                            "doctor": appointment.doctor,
                            "slot": appointment.slot,
                            "patient": appointment.patient,
                        }),
                    );
                    return Ok(appointment);
                }
                Err(InsertOutcome::SlotTaken) => {
                    warn!("Slot {} for {} already booked", request.slot, request.doctor);
                    return Err(BookingError::SlotNoLongerAvailable);
                }
                Err(InsertOutcome::IdTaken) => {
                    debug!("Appointment id collision, retrying");
                }
                Err(InsertOutcome::Failed(e)) => return Err(e),
            }
        }

        error!("No free appointment id after {} attempts", MAX_ID_ATTEMPTS);
        Err(BookingError::IdsExhausted(MAX_ID_ATTEMPTS))
    }

    /// Appointments of a department in slot order.
    pub fn list_appointments(&self, department_code: &str) -> Result<Vec<Appointment>, BookingError> {
        let conn = self.db.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, dept_code, doctor, slot, patient, created_at FROM appointments \
             WHERE dept_code = ?1 ORDER BY slot, doctor",
        )?;
        let appointments = stmt
            .query_map(params![department_code], |row| {
                Ok(Appointment {
                    id: row.get(0)?,
                    department_code: row.get(1)?,
                    doctor: row.get(2)?,
                    slot: row.get(3)?,
                    patient: row.get(4)?,
                    created_at: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(appointments)
    }

    /// Refreshed availability for the department, as of now.
    pub fn availability(&self, department_code: &str) -> Result<Vec<AvailabilityRow>, BookingError> {
        Ok(self.availability.availability(department_code)?)
    }

    fn insert(&self, appointment: &Appointment) -> Result<(), InsertOutcome> {
        let conn = self
            .db
            .conn()
            .map_err(|e| InsertOutcome::Failed(BookingError::Database(e)))?;

        let result = conn.execute(
            "INSERT INTO appointments (id, dept_code, doctor, slot, patient, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                appointment.id,
                appointment.department_code,
                appointment.doctor,
                appointment.slot,
                appointment.patient,
                appointment.created_at,
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation
                    && err.extended_code == SQLITE_CONSTRAINT_UNIQUE =>
            {
                Err(InsertOutcome::SlotTaken)
            }
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation
                    && err.extended_code == SQLITE_CONSTRAINT_PRIMARYKEY =>
            {
                Err(InsertOutcome::IdTaken)
            }
            Err(e) => Err(InsertOutcome::Failed(e.into())),
        }
    }
}

enum InsertOutcome {
    SlotTaken,
    IdTaken,
    Failed(BookingError),
}

/// Short opaque token: the first eight hex digits of a v4 UUID.
fn new_appointment_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}
