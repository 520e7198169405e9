pub mod holiday;
pub mod schedule;
pub mod shift;
pub mod user;

// Re-export all repositories for easy importing
pub use holiday::HolidayRepository;
pub use schedule::ScheduleRepository;
pub use shift::ShiftRepository;
pub use user::UserRepository;
