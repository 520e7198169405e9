use actix_web::{http::StatusCode, test, web, App, HttpResponse};
use pretty_assertions::assert_eq;
use sqlx::PgPool;

use vagtplan_api::database::models::Role;
use vagtplan_api::database::repositories::UserRepository;
use vagtplan_api::middleware::AccessControl;
use vagtplan_api::services::{AccessGate, AccessPolicy};

mod common;

fn gate(pool: &PgPool, allowed: &[&str]) -> AccessGate {
    AccessGate::new(
        AccessPolicy::new(
            allowed.iter().map(|e| e.to_string()).collect(),
            "/admin".to_string(),
            "/vagtplan".to_string(),
        ),
        UserRepository::new(pool.clone()),
    )
}

macro_rules! gated_app {
    ($gate:expr) => {
        test::init_service(
            App::new()
                .wrap(AccessControl::new($gate))
                .route(
                    "/admin/overview",
                    web::get().to(|| async { HttpResponse::Ok().finish() }),
                )
                .route(
                    "/vagtplan",
                    web::get().to(|| async { HttpResponse::Ok().finish() }),
                )
                .route(
                    "/health",
                    web::get().to(|| async { HttpResponse::Ok().finish() }),
                ),
        )
        .await
    };
}

#[sqlx::test(migrations = "./migrations")]
async fn requests_without_identity_are_denied(pool: PgPool) {
    common::seed_user(&pool, "Mette", "mette@example.com", Role::User).await;
    let app = gated_app!(gate(&pool, &["mette@example.com"]));

    let req = test::TestRequest::get().uri("/vagtplan").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn unlisted_identities_are_denied(pool: PgPool) {
    common::seed_user(&pool, "Intruder", "intruder@example.com", Role::User).await;
    let app = gated_app!(gate(&pool, &["mette@example.com"]));

    let req = test::TestRequest::get()
        .uri("/vagtplan")
        .insert_header(("x-user-email", "intruder@example.com"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn identities_without_an_account_are_denied(pool: PgPool) {
    // Allow-listed but no user row to resolve a role from
    let app = gated_app!(gate(&pool, &["mette@example.com"]));

    let req = test::TestRequest::get()
        .uri("/vagtplan")
        .insert_header(("x-user-email", "mette@example.com"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn admin_routes_are_closed_to_the_user_role(pool: PgPool) {
    common::seed_user(&pool, "Mette", "mette@example.com", Role::User).await;
    common::seed_user(&pool, "Chef", "chef@example.com", Role::Admin).await;
    let app = gated_app!(gate(&pool, &["mette@example.com", "chef@example.com"]));

    let req = test::TestRequest::get()
        .uri("/admin/overview")
        .insert_header(("x-user-email", "mette@example.com"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri("/admin/overview")
        .insert_header(("x-user-email", "chef@example.com"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn health_stays_reachable_without_identity(pool: PgPool) {
    let app = gated_app!(gate(&pool, &["mette@example.com"]));

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn the_root_path_redirects_to_the_landing_route(pool: PgPool) {
    common::seed_user(&pool, "Mette", "mette@example.com", Role::User).await;
    let app = gated_app!(gate(&pool, &["mette@example.com"]));

    let req = test::TestRequest::get()
        .uri("/")
        .insert_header(("x-user-email", "mette@example.com"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        resp.headers()
            .get(actix_web::http::header::LOCATION)
            .and_then(|h| h.to_str().ok()),
        Some("/vagtplan")
    );
}
