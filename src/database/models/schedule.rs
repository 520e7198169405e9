use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{JobType, ShiftStatus, ShiftType, UserSummary};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Week {
    pub id: i64,
    pub week_number: i32,
    pub year: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Day {
    pub id: i64,
    pub week_id: i64,
    pub name: String,
    pub date: NaiveDate,
}

/// A (year, week) pair with ISO-aware wrap-around arithmetic.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WeekRef {
    pub year: i32,
    pub week_number: i32,
}

impl WeekRef {
    pub fn new(year: i32, week_number: i32) -> Self {
        Self { year, week_number }
    }

    /// ISO week count of a year. December 28th always falls in the last
    /// ISO week, so its week number is the count (52 or 53).
    pub fn weeks_in_year(year: i32) -> i32 {
        NaiveDate::from_ymd_opt(year, 12, 28)
            .map(|d| d.iso_week().week() as i32)
            .unwrap_or(52)
    }

    pub fn next(&self) -> WeekRef {
        if self.week_number >= Self::weeks_in_year(self.year) {
            WeekRef::new(self.year + 1, 1)
        } else {
            WeekRef::new(self.year, self.week_number + 1)
        }
    }

    pub fn previous(&self) -> WeekRef {
        if self.week_number <= 1 {
            WeekRef::new(self.year - 1, Self::weeks_in_year(self.year - 1))
        } else {
            WeekRef::new(self.year, self.week_number - 1)
        }
    }
}

/// One shift as it appears inside a weekly schedule, with its assignee
/// and job type joined in.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftDetail {
    pub id: i64,
    pub day_id: i64,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    pub shift_type: ShiftType,
    pub break_minutes: i32,
    pub status: ShiftStatus,
    pub user: UserSummary,
    pub job_type: Option<JobType>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySchedule {
    pub id: i64,
    pub name: String,
    pub date: NaiveDate,
    /// Derived count of non-working shifts; computed on read, never stored.
    pub absences: usize,
    pub shifts: Vec<ShiftDetail>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekNavigation {
    pub previous: WeekRef,
    pub next: WeekRef,
    pub has_previous: bool,
    pub has_next: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekSchedule {
    pub id: i64,
    pub week_number: i32,
    pub year: i32,
    pub days: Vec<DaySchedule>,
    pub navigation: WeekNavigation,
}
