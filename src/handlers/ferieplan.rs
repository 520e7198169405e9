use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::database::models::{DecisionInput, EditHolidayInput, SubmitHolidayInput};
use crate::error::AppError;
use crate::services::{AccessGate, HolidayService, RequestIdentity};

#[derive(Debug, Deserialize)]
pub struct RequestListQuery {
    pub status: Option<String>,
}

/// Admin listing of every holiday request, optionally filtered by status.
pub async fn get_requests(
    identity: RequestIdentity,
    gate: web::Data<AccessGate>,
    holidays: web::Data<HolidayService>,
    query: web::Query<RequestListQuery>,
) -> Result<HttpResponse, AppError> {
    let actor = gate.require_user(&identity).await?;

    let requests = holidays
        .list_all(&actor, query.status.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(requests))
}

pub async fn create_request(
    identity: RequestIdentity,
    gate: web::Data<AccessGate>,
    holidays: web::Data<HolidayService>,
    input: web::Json<SubmitHolidayInput>,
) -> Result<HttpResponse, AppError> {
    let actor = gate.require_user(&identity).await?;

    let request = holidays.submit(&actor, input.into_inner()).await?;

    Ok(HttpResponse::Created().json(request))
}

pub async fn edit_request(
    identity: RequestIdentity,
    gate: web::Data<AccessGate>,
    holidays: web::Data<HolidayService>,
    path: web::Path<i64>,
    input: web::Json<EditHolidayInput>,
) -> Result<HttpResponse, AppError> {
    let actor = gate.require_user(&identity).await?;

    let updated = holidays
        .edit(&actor, path.into_inner(), input.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Holiday request updated successfully",
        "updatedRequest": updated,
    })))
}

pub async fn delete_request(
    identity: RequestIdentity,
    gate: web::Data<AccessGate>,
    holidays: web::Data<HolidayService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let actor = gate.require_user(&identity).await?;

    holidays.remove(&actor, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Holiday request deleted successfully"
    })))
}

/// Admin decision with the approved-only shift side effect.
pub async fn decide_request(
    identity: RequestIdentity,
    gate: web::Data<AccessGate>,
    holidays: web::Data<HolidayService>,
    path: web::Path<i64>,
    input: web::Json<DecisionInput>,
) -> Result<HttpResponse, AppError> {
    let actor = gate.require_user(&identity).await?;

    let outcome = holidays
        .decide(&actor, path.into_inner(), input.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Holiday request and shifts updated successfully",
        "updatedRequest": outcome.updated_request,
        "updatedShifts": outcome.updated_shifts,
    })))
}

/// The calling user's own requests.
pub async fn my_requests(
    identity: RequestIdentity,
    gate: web::Data<AccessGate>,
    holidays: web::Data<HolidayService>,
) -> Result<HttpResponse, AppError> {
    let actor = gate.require_user(&identity).await?;

    let requests = holidays.list_for_user(&actor).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "ferieplan": requests })))
}
