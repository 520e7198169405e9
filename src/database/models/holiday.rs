use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct HolidayRequest {
    pub id: i64,
    pub user_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub reason: Option<String>,
    pub status: HolidayStatus,
    pub decided_by: Option<Uuid>,
    pub decision_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
    #[serde(rename_all = "lowercase")]
    pub enum HolidayStatus {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
    }
}

/// A request as listed for admins, with the owner's name joined in.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct HolidayRequestWithUser {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub request: HolidayRequest,
    pub user_name: String,
}

/// Submission body. Dates arrive as strings and are validated before
/// anything is written.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitHolidayInput {
    pub start_date: String,
    pub end_date: String,
    pub reason: Option<String>,
    /// Present on admin submissions on behalf of another user; the
    /// self-service route ignores it.
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditHolidayInput {
    pub start_date: String,
    pub end_date: String,
    pub reason: Option<String>,
}

/// Admin decision body for `PUT .../{id}/approve`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionInput {
    pub status: String,
    pub reason: Option<String>,
    /// Shift type applied to the user's shifts in the request range when
    /// the decision is an approval.
    pub shift_action: String,
    pub user_id: Uuid,
}

/// Outcome of an admin decision: the mutated request plus how many
/// shifts the side effect touched.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionOutcome {
    pub updated_request: HolidayRequest,
    pub updated_shifts: u64,
}
