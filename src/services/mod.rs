pub mod access;
pub mod holiday;
pub mod schedule;

pub use access::{AccessDecision, AccessGate, AccessPolicy, RequestIdentity};
pub use holiday::HolidayService;
pub use schedule::ScheduleService;
