use chrono::{DateTime, NaiveDate, Utc};

use crate::database::models::{
    DecisionInput, DecisionOutcome, EditHolidayInput, HolidayRequest, HolidayRequestWithUser,
    HolidayStatus, ShiftType, SubmitHolidayInput, User,
};
use crate::database::repositories::{HolidayRepository, ShiftRepository, UserRepository};
use crate::error::AppError;

/// Lifecycle of a holiday request: pending until an admin decision, with
/// the approved branch bulk-updating the owner's shifts in range.
#[derive(Clone)]
pub struct HolidayService {
    holiday_repository: HolidayRepository,
    user_repository: UserRepository,
}

impl HolidayService {
    pub fn new(holiday_repository: HolidayRepository, user_repository: UserRepository) -> Self {
        Self {
            holiday_repository,
            user_repository,
        }
    }

    pub async fn submit(
        &self,
        actor: &User,
        input: SubmitHolidayInput,
    ) -> Result<HolidayRequest, AppError> {
        let (start, end) = parse_date_range(&input.start_date, &input.end_date)?;

        // Admins may file on behalf of another user; everyone else files
        // for themselves.
        let owner_id = match input.email.as_deref() {
            Some(email) if !email.eq_ignore_ascii_case(&actor.email) => {
                if !actor.is_admin() {
                    return Err(AppError::Forbidden(
                        "Can only submit holiday requests for yourself".to_string(),
                    ));
                }
                self.user_repository
                    .find_by_email(email)
                    .await?
                    .ok_or_else(|| {
                        AppError::not_found("User with this email does not exist")
                    })?
                    .id
            }
            _ => actor.id,
        };

        Ok(self
            .holiday_repository
            .create_request(owner_id, start, end, input.reason)
            .await?)
    }

    pub async fn edit(
        &self,
        actor: &User,
        request_id: i64,
        input: EditHolidayInput,
    ) -> Result<HolidayRequest, AppError> {
        let (start, end) = parse_date_range(&input.start_date, &input.end_date)?;

        let existing = self.require_request(request_id).await?;

        if existing.user_id != actor.id && !actor.is_admin() {
            return Err(AppError::Forbidden(
                "Cannot edit other users' holiday requests".to_string(),
            ));
        }

        if existing.status != HolidayStatus::Pending {
            return Err(AppError::bad_request(
                "Cannot edit a request that has already been decided",
            ));
        }

        Ok(self
            .holiday_repository
            .update_fields(request_id, start, end, input.reason)
            .await?)
    }

    /// Admin decision. An approval also reassigns the target user's
    /// shifts inside the request's date range; both writes commit in one
    /// transaction so the request can never be approved with the
    /// schedule left untouched.
    pub async fn decide(
        &self,
        actor: &User,
        request_id: i64,
        input: DecisionInput,
    ) -> Result<DecisionOutcome, AppError> {
        if !actor.is_admin() {
            return Err(AppError::Forbidden(
                "Only admins can decide holiday requests".to_string(),
            ));
        }

        let decision: HolidayStatus = input
            .status
            .parse()
            .map_err(|_| AppError::bad_request("Invalid decision status"))?;
        if decision == HolidayStatus::Pending {
            return Err(AppError::bad_request(
                "Decision must be approved or rejected",
            ));
        }

        let shift_action: ShiftType = input
            .shift_action
            .parse()
            .map_err(|_| AppError::bad_request("Invalid shift action"))?;

        let request = self.require_request(request_id).await?;

        if self
            .user_repository
            .find_by_id(input.user_id)
            .await?
            .is_none()
        {
            return Err(AppError::not_found("User not found"));
        }

        let mut tx = self.holiday_repository.pool().begin().await.map_err(AppError::from)?;

        let updated_request = HolidayRepository::decide(
            &mut *tx,
            request_id,
            decision,
            actor.id,
            input.reason,
        )
        .await?;

        // The schedule is only touched on approval; a rejection changes
        // request state alone.
        let updated_shifts = if decision == HolidayStatus::Approved {
            ShiftRepository::reassign_in_range(
                &mut *tx,
                input.user_id,
                day_floor(request.start_date),
                day_floor(request.end_date),
                shift_action,
            )
            .await?
        } else {
            0
        };

        tx.commit().await.map_err(AppError::from)?;

        Ok(DecisionOutcome {
            updated_request,
            updated_shifts,
        })
    }

    pub async fn remove(&self, actor: &User, request_id: i64) -> Result<(), AppError> {
        let existing = self.require_request(request_id).await?;

        let owns_pending =
            existing.user_id == actor.id && existing.status == HolidayStatus::Pending;
        if !actor.is_admin() && !owns_pending {
            return Err(AppError::Forbidden(
                "Cannot delete this holiday request".to_string(),
            ));
        }

        self.holiday_repository.delete_request(request_id).await?;

        Ok(())
    }

    pub async fn list_for_user(&self, actor: &User) -> Result<Vec<HolidayRequest>, AppError> {
        Ok(self.holiday_repository.list_for_user(actor.id).await?)
    }

    pub async fn list_all(
        &self,
        actor: &User,
        status_filter: Option<&str>,
    ) -> Result<Vec<HolidayRequestWithUser>, AppError> {
        if !actor.is_admin() {
            return Err(AppError::Forbidden(
                "Only admins can list all holiday requests".to_string(),
            ));
        }

        let status = match status_filter {
            None | Some("all") => None,
            Some(raw) => Some(
                raw.parse::<HolidayStatus>()
                    .map_err(|_| AppError::bad_request("Invalid status filter"))?,
            ),
        };

        Ok(self.holiday_repository.list_all(status).await?)
    }

    async fn require_request(&self, request_id: i64) -> Result<HolidayRequest, AppError> {
        self.holiday_repository
            .find_by_id(request_id)
            .await?
            .ok_or_else(|| AppError::not_found("Holiday request not found"))
    }
}

/// Calendar date of a timestamp; the shift side effect works on whole
/// days, inclusive at both ends.
fn day_floor(ts: DateTime<Utc>) -> NaiveDate {
    ts.date_naive()
}

/// Accepts RFC 3339 timestamps or plain `YYYY-MM-DD` dates, the two
/// formats clients have historically sent.
pub fn parse_date(raw: &str) -> Result<DateTime<Utc>, AppError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }

    Err(AppError::bad_request(
        "Invalid date format for start date or end date",
    ))
}

fn parse_date_range(
    start_raw: &str,
    end_raw: &str,
) -> Result<(DateTime<Utc>, DateTime<Utc>), AppError> {
    let start = parse_date(start_raw)?;
    let end = parse_date(end_raw)?;

    if start > end {
        return Err(AppError::bad_request("Start date cannot be after end date"));
    }

    Ok((start, end))
}
