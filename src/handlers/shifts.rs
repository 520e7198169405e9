use actix_web::{web, HttpResponse};

use crate::database::models::{ShiftType, ShiftUpdateInput};
use crate::database::repositories::ShiftRepository;
use crate::error::AppError;
use crate::services::{AccessGate, RequestIdentity};

pub async fn update_shift(
    identity: RequestIdentity,
    gate: web::Data<AccessGate>,
    shifts: web::Data<ShiftRepository>,
    path: web::Path<i64>,
    input: web::Json<ShiftUpdateInput>,
) -> Result<HttpResponse, AppError> {
    let shift_id = path.into_inner();
    let input = input.into_inner();

    let actor = gate.require_user(&identity).await?;

    let existing = shifts
        .find_by_id(shift_id)
        .await?
        .ok_or_else(|| AppError::not_found("Shift not found"))?;

    if !actor.is_admin() && existing.user_id != actor.id {
        return Err(AppError::Forbidden(
            "Cannot update other users' shifts".to_string(),
        ));
    }

    let shift_type: ShiftType = input
        .shift_type
        .parse()
        .map_err(|_| AppError::bad_request("Invalid shift type"))?;

    let break_minutes = input.break_minutes.unwrap_or(existing.break_minutes);
    if break_minutes < 0 {
        return Err(AppError::bad_request("Break minutes cannot be negative"));
    }

    // Working shifts carry real hours; absence types may leave them out.
    if shift_type == ShiftType::AtWork && (input.start_time.is_none() || input.end_time.is_none()) {
        return Err(AppError::bad_request(
            "Working shifts require start and end times",
        ));
    }

    if let (Some(start), Some(end)) = (input.start_time, input.end_time) {
        if start > end {
            return Err(AppError::bad_request(
                "Shift start time must precede end time",
            ));
        }
    }

    let updated = shifts
        .update_shift(
            shift_id,
            input.start_time,
            input.end_time,
            shift_type,
            break_minutes,
            input.user_id,
            input.job_type_id,
        )
        .await?
        .ok_or_else(|| AppError::not_found("Shift not found"))?;

    Ok(HttpResponse::Ok().json(updated))
}
