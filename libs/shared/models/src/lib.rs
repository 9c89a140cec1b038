pub mod catalogue;
pub mod error;
pub mod events;

pub use catalogue::{find_department, Department, DepartmentRef, DoctorSeed, DEPARTMENTS, DOCTOR_ROSTER};
pub use error::AppError;
pub use events::{EventKind, EventLog, JsonlEventLog, TracingEventLog};
