use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::database::models::{ShiftType, WeekSchedule};
use crate::error::AppError;
use crate::services::schedule::filter_shifts_by_type;
use crate::services::{RequestIdentity, ScheduleService};

#[derive(Debug, Deserialize)]
pub struct ScheduleQuery {
    /// Narrow the listed shifts to one type, e.g. `day-off` for the
    /// holiday-plan view. Absence counts always cover the full day.
    #[serde(rename = "type")]
    pub shift_type: Option<String>,
}

pub async fn get_week(
    _identity: RequestIdentity,
    schedule: web::Data<ScheduleService>,
    path: web::Path<(String, String)>,
    query: web::Query<ScheduleQuery>,
) -> Result<HttpResponse, AppError> {
    let (year_raw, week_raw) = path.into_inner();

    let (Ok(year), Ok(week_number)) = (year_raw.parse::<i32>(), week_raw.parse::<i32>()) else {
        return Err(AppError::bad_request("Invalid year or week parameter"));
    };

    let week_ref = ScheduleService::validate_week_ref(year, week_number)?;

    let week = schedule
        .get_week(week_ref)
        .await?
        .ok_or_else(|| AppError::not_found("Week not found"))?;

    Ok(HttpResponse::Ok().json(apply_type_filter(week, query.into_inner())?))
}

/// Legacy route addressing a week by number alone; the year is resolved
/// to the most recent one carrying that week.
pub async fn get_week_legacy(
    _identity: RequestIdentity,
    schedule: web::Data<ScheduleService>,
    path: web::Path<String>,
    query: web::Query<ScheduleQuery>,
) -> Result<HttpResponse, AppError> {
    let week_raw = path.into_inner();

    let Ok(week_number) = week_raw.parse::<i32>() else {
        return Err(AppError::bad_request("Invalid week parameter"));
    };

    if !(1..=53).contains(&week_number) {
        return Err(AppError::bad_request("Invalid week parameter"));
    }

    let year = schedule
        .resolve_year_for_week(week_number)
        .await?
        .ok_or_else(|| AppError::not_found("Week not found"))?;

    let week_ref = ScheduleService::validate_week_ref(year, week_number)?;

    let week = schedule
        .get_week(week_ref)
        .await?
        .ok_or_else(|| AppError::not_found("Week not found"))?;

    Ok(HttpResponse::Ok().json(apply_type_filter(week, query.into_inner())?))
}

fn apply_type_filter(
    mut week: WeekSchedule,
    query: ScheduleQuery,
) -> Result<WeekSchedule, AppError> {
    let Some(raw) = query.shift_type else {
        return Ok(week);
    };

    let wanted: ShiftType = raw
        .parse()
        .map_err(|_| AppError::bad_request("Invalid shift type filter"))?;

    for day in &mut week.days {
        day.shifts = filter_shifts_by_type(&day.shifts, |t| t == wanted);
    }

    Ok(week)
}
