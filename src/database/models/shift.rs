use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub id: i64,
    pub day_id: i64,
    pub user_id: Uuid,
    pub job_type_id: Option<i64>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    pub shift_type: ShiftType,
    pub break_minutes: i32,
    pub status: ShiftStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
    #[serde(rename_all = "kebab-case")]
    pub enum ShiftType {
        // Stable keys; the Danish strings of older schedule data are
        // accepted as parse aliases and never stored.
        AtWork => "at-work" | "på arbejde",
        SickLeave => "sick-leave" | "syg",
        DayOff => "day-off" | "fridag",
    }
}

impl ShiftType {
    /// Anything that is not time at work counts toward a day's absences.
    pub fn is_absence(&self) -> bool {
        !matches!(self, ShiftType::AtWork)
    }
}

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
    #[serde(rename_all = "lowercase")]
    pub enum ShiftStatus {
        Default => "default",
        Updated => "updated",
    }
}

impl Default for ShiftStatus {
    fn default() -> Self {
        ShiftStatus::Default
    }
}

/// Body of `PUT /api/shifts/{id}`. The type arrives as a raw string so
/// legacy Danish values can be normalized during validation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftUpdateInput {
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    pub shift_type: String,
    pub break_minutes: Option<i32>,
    pub user_id: Uuid,
    pub job_type_id: Option<i64>,
}
