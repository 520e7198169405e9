pub mod ferieplan;
pub mod schedule;
pub mod session;
pub mod shifts;
pub mod users;
