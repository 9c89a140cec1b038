use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use rusqlite::params;
use tracing::debug;

use shared_database::Database;

use crate::models::{AvailabilityRow, DoctorError};
use crate::services::{RosterService, SlotCalendar};

/// Free slots per doctor: the slot grid minus booked (doctor, slot) pairs.
///
/// Reads bookings as of call time without locking; a later booking of a
/// listed slot is settled by the appointments uniqueness constraint.
pub struct AvailabilityService {
    db: Arc<Database>,
    roster: RosterService,
    calendar: SlotCalendar,
}

impl AvailabilityService {
    pub fn new(db: Arc<Database>, calendar: SlotCalendar) -> Self {
        Self {
            roster: RosterService::new(db.clone()),
            db,
            calendar,
        }
    }

    pub fn roster(&self) -> &RosterService {
        &self.roster
    }

    pub fn calendar(&self) -> &SlotCalendar {
        &self.calendar
    }

    pub fn availability(&self, department_code: &str) -> Result<Vec<AvailabilityRow>, DoctorError> {
        self.availability_at(department_code, Local::now().naive_local())
    }

    pub fn availability_at(
        &self,
        department_code: &str,
        now: NaiveDateTime,
    ) -> Result<Vec<AvailabilityRow>, DoctorError> {
        debug!("Computing availability for department: {}", department_code);

        let doctors = self.roster.list_doctors(department_code)?;
        let grid = self.calendar.slots_at(now);
        let booked = self.booked_pairs(department_code)?;

        let rows = doctors
            .into_iter()
            .map(|doctor| {
                let taken = booked.get(&doctor.name);
                let slots = grid
                    .iter()
                    .filter(|slot| taken.map_or(true, |t| !t.contains(*slot)))
                    .take(self.calendar.per_doctor)
                    .cloned()
                    .collect();
                AvailabilityRow {
                    doctor: doctor.name,
                    slots,
                }
            })
            .collect();

        Ok(rows)
    }

    /// Booked slots of a department grouped by doctor name.
    fn booked_pairs(
        &self,
        department_code: &str,
    ) -> Result<HashMap<String, HashSet<String>>, DoctorError> {
        let conn = self.db.conn()?;
        let mut stmt = conn.prepare("SELECT doctor, slot FROM appointments WHERE dept_code = ?1")?;
        let pairs = stmt.query_map(params![department_code], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut booked: HashMap<String, HashSet<String>> = HashMap::new();
        for pair in pairs {
            let (doctor, slot) = pair?;
            booked.entry(doctor).or_default().insert(slot);
        }
        Ok(booked)
    }
}
