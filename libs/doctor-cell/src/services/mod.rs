pub mod roster;
pub mod calendar;
pub mod availability;

pub use roster::RosterService;
pub use calendar::SlotCalendar;
pub use availability::AvailabilityService;
