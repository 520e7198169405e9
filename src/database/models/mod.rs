pub mod holiday;
pub mod job_type;
pub mod macros;
pub mod schedule;
pub mod shift;
pub mod user;

// Re-export all models for easy importing
pub use holiday::*;
pub use job_type::*;
pub use schedule::*;
pub use shift::*;
pub use user::*;
