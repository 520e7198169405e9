use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{CreateUserInput, UpdateUserInput, User};
use crate::database::repositories::UserRepository;
use crate::error::AppError;
use crate::services::{AccessGate, RequestIdentity};

#[derive(Debug, Deserialize)]
pub struct RoleQuery {
    pub email: Option<String>,
}

pub async fn get_users(
    _identity: RequestIdentity,
    users: web::Data<UserRepository>,
) -> Result<HttpResponse, AppError> {
    let all_users = users.list_users().await?;

    Ok(HttpResponse::Ok().json(all_users))
}

pub async fn create_user(
    identity: RequestIdentity,
    gate: web::Data<AccessGate>,
    users: web::Data<UserRepository>,
    input: web::Json<CreateUserInput>,
) -> Result<HttpResponse, AppError> {
    let actor = gate.require_user(&identity).await?;
    if !actor.is_admin() {
        return Err(AppError::Forbidden(
            "Only admins can create users".to_string(),
        ));
    }

    let input = input.into_inner();
    if input.name.trim().is_empty() || input.email.trim().is_empty() {
        return Err(AppError::bad_request("Name and email are required"));
    }

    if users.email_exists(&input.email).await? {
        return Err(AppError::bad_request("Email already exists"));
    }

    let user = users.create_user(input).await?;

    Ok(HttpResponse::Created().json(user))
}

pub async fn get_user(
    _identity: RequestIdentity,
    users: web::Data<UserRepository>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let user = find_by_key(&users, &path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(user))
}

pub async fn update_user(
    identity: RequestIdentity,
    gate: web::Data<AccessGate>,
    users: web::Data<UserRepository>,
    path: web::Path<String>,
    input: web::Json<UpdateUserInput>,
) -> Result<HttpResponse, AppError> {
    let actor = gate.require_user(&identity).await?;
    if !actor.is_admin() {
        return Err(AppError::Forbidden(
            "Only admins can update users".to_string(),
        ));
    }

    let existing = find_by_key(&users, &path.into_inner()).await?;

    let updated = users
        .update_user(existing.id, input.into_inner())
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(HttpResponse::Ok().json(updated))
}

pub async fn delete_user(
    identity: RequestIdentity,
    gate: web::Data<AccessGate>,
    users: web::Data<UserRepository>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let actor = gate.require_user(&identity).await?;
    if !actor.is_admin() {
        return Err(AppError::Forbidden(
            "Only admins can delete users".to_string(),
        ));
    }

    let existing = find_by_key(&users, &path.into_inner()).await?;

    // Shifts and holiday requests owned by the user go with it.
    users.delete_user(existing.id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "User deleted successfully"
    })))
}

/// Role resolution for the access layer of UI callers.
pub async fn resolve_role(
    users: web::Data<UserRepository>,
    input: web::Json<RoleQuery>,
) -> Result<HttpResponse, AppError> {
    let email = input
        .into_inner()
        .email
        .filter(|e| !e.trim().is_empty())
        .ok_or_else(|| AppError::bad_request("Email is required"))?;

    let role = users
        .role_of(&email)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "role": role })))
}

/// Routes address a user by id or email interchangeably.
async fn find_by_key(users: &UserRepository, key: &str) -> Result<User, AppError> {
    let user = match key.parse::<Uuid>() {
        Ok(id) => users.find_by_id(id).await?,
        Err(_) => users.find_by_email(key).await?,
    };

    user.ok_or_else(|| AppError::not_found("User not found"))
}
