/// Tables for the clinic reference data and booked appointments.
///
/// `appointments` carries `UNIQUE(doctor, slot)`; the booking store relies on
/// the constraint rather than a prior read to reject double bookings.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS departments (
    code TEXT PRIMARY KEY,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS doctors (
    id TEXT PRIMARY KEY,
    dept_code TEXT NOT NULL REFERENCES departments(code),
    name TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_doctors_dept ON doctors(dept_code);

CREATE TABLE IF NOT EXISTS appointments (
    id TEXT PRIMARY KEY,
    dept_code TEXT NOT NULL,
    doctor TEXT NOT NULL,
    slot TEXT NOT NULL,
    patient TEXT,
    created_at TEXT NOT NULL,
    UNIQUE(doctor, slot)
);

CREATE INDEX IF NOT EXISTS idx_appointments_dept ON appointments(dept_code);
"#;
