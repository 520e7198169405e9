use actix_web::{http::StatusCode, test, web, App};
use pretty_assertions::assert_eq;
use serde_json::json;
use sqlx::PgPool;

use vagtplan_api::database::models::{Role, ShiftType};
use vagtplan_api::database::repositories::{
    HolidayRepository, ScheduleRepository, ShiftRepository, UserRepository,
};
use vagtplan_api::handlers::{ferieplan, schedule, shifts, users};
use vagtplan_api::middleware::AccessControl;
use vagtplan_api::services::{AccessGate, AccessPolicy, HolidayService, ScheduleService};

mod common;

/// The production route table over a test pool. An empty allow-list
/// leaves the gate checking only that the identity resolves to a user.
macro_rules! api_app {
    ($pool:expr) => {{
        let user_repository = UserRepository::new($pool.clone());
        let schedule_service = ScheduleService::new(ScheduleRepository::new($pool.clone()));
        let holiday_service = HolidayService::new(
            HolidayRepository::new($pool.clone()),
            user_repository.clone(),
        );
        let access_gate = AccessGate::new(
            AccessPolicy::new(vec![], "/admin".to_string(), "/vagtplan".to_string()),
            user_repository.clone(),
        );

        test::init_service(
            App::new()
                .app_data(web::Data::new(user_repository))
                .app_data(web::Data::new(ShiftRepository::new($pool.clone())))
                .app_data(web::Data::new(schedule_service))
                .app_data(web::Data::new(holiday_service))
                .app_data(web::Data::new(access_gate.clone()))
                .wrap(AccessControl::new(access_gate))
                .service(
                    web::scope("/api")
                        .service(
                            web::scope("/users")
                                .route("/role", web::post().to(users::resolve_role))
                                .route("", web::get().to(users::get_users))
                                .route("", web::post().to(users::create_user))
                                .route("/{key}", web::get().to(users::get_user))
                                .route("/{key}", web::put().to(users::update_user))
                                .route("/{key}", web::delete().to(users::delete_user)),
                        )
                        .service(
                            web::scope("/schedule")
                                .route("/{year}/{week}", web::get().to(schedule::get_week))
                                .route("/{week}", web::get().to(schedule::get_week_legacy)),
                        )
                        .service(
                            web::scope("/shifts")
                                .route("/{id}", web::put().to(shifts::update_shift)),
                        )
                        .service(
                            web::scope("/ferieplan")
                                .route("/requests", web::get().to(ferieplan::get_requests))
                                .route("/requests", web::post().to(ferieplan::create_request))
                                .route("/requests/{id}", web::put().to(ferieplan::edit_request))
                                .route(
                                    "/requests/{id}",
                                    web::delete().to(ferieplan::delete_request),
                                )
                                .route(
                                    "/requests/{id}/approve",
                                    web::put().to(ferieplan::decide_request),
                                )
                                .route(
                                    "/requests/{id}/edit",
                                    web::put().to(ferieplan::edit_request),
                                )
                                .route("/user", web::get().to(ferieplan::my_requests)),
                        ),
                ),
        )
        .await
    }};
}

#[sqlx::test(migrations = "./migrations")]
async fn malformed_week_parameters_are_client_errors(pool: PgPool) {
    common::seed_user(&pool, "Mette", "mette@example.com", Role::User).await;
    let app = api_app!(&pool);

    for uri in [
        "/api/schedule/2024/abc",
        "/api/schedule/abc/47",
        "/api/schedule/2024/0",
        "/api/schedule/2024/54",
        "/api/schedule/abc",
    ] {
        let req = test::TestRequest::get()
            .uri(uri)
            .insert_header(("x-user-email", "mette@example.com"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "uri: {}", uri);
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn missing_weeks_are_not_found(pool: PgPool) {
    common::seed_user(&pool, "Mette", "mette@example.com", Role::User).await;
    let app = api_app!(&pool);

    let req = test::TestRequest::get()
        .uri("/api/schedule/2024/47")
        .insert_header(("x-user-email", "mette@example.com"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn week_payload_carries_days_shifts_and_navigation(pool: PgPool) {
    let mette = common::seed_user(&pool, "Mette", "mette@example.com", Role::User).await;
    let (_, day_ids) =
        common::seed_week(&pool, 2024, 47, common::monday_of_week_47_2024()).await;
    common::seed_shift(&pool, day_ids[0], mette.id, ShiftType::AtWork).await;
    common::seed_shift(&pool, day_ids[0], mette.id, ShiftType::DayOff).await;

    let app = api_app!(&pool);

    let req = test::TestRequest::get()
        .uri("/api/schedule/2024/47")
        .insert_header(("x-user-email", "mette@example.com"))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["weekNumber"], 47);
    assert_eq!(body["year"], 2024);
    assert_eq!(body["days"].as_array().unwrap().len(), 7);
    assert_eq!(body["days"][0]["name"], "Mandag");
    assert_eq!(body["days"][0]["absences"], 1);
    assert_eq!(body["days"][0]["shifts"].as_array().unwrap().len(), 2);
    assert_eq!(body["navigation"]["next"]["weekNumber"], 48);
    assert_eq!(body["navigation"]["hasNext"], false);

    // The holiday-plan view narrows to absence shifts
    let req = test::TestRequest::get()
        .uri("/api/schedule/2024/47?type=day-off")
        .insert_header(("x-user-email", "mette@example.com"))
        .to_request();
    let filtered: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(filtered["days"][0]["shifts"].as_array().unwrap().len(), 1);
    assert_eq!(filtered["days"][0]["shifts"][0]["type"], "day-off");
    assert_eq!(filtered["days"][0]["absences"], 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn submit_and_list_own_requests_over_http(pool: PgPool) {
    common::seed_user(&pool, "Mette", "mette@example.com", Role::User).await;
    let app = api_app!(&pool);

    let req = test::TestRequest::post()
        .uri("/api/ferieplan/requests")
        .insert_header(("x-user-email", "mette@example.com"))
        .set_json(json!({
            "startDate": "2024-11-20",
            "endDate": "2024-11-21",
            "reason": "Ferie"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri("/api/ferieplan/user")
        .insert_header(("x-user-email", "mette@example.com"))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    let requests = body["ferieplan"].as_array().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["status"], "pending");
    assert_eq!(requests[0]["reason"], "Ferie");
}

#[sqlx::test(migrations = "./migrations")]
async fn inverted_ranges_are_rejected_over_http(pool: PgPool) {
    common::seed_user(&pool, "Mette", "mette@example.com", Role::User).await;
    let app = api_app!(&pool);

    let req = test::TestRequest::post()
        .uri("/api/ferieplan/requests")
        .insert_header(("x-user-email", "mette@example.com"))
        .set_json(json!({
            "startDate": "2024-11-22",
            "endDate": "2024-11-20"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn approval_over_http_applies_the_shift_side_effect(pool: PgPool) {
    let mette = common::seed_user(&pool, "Mette", "mette@example.com", Role::User).await;
    common::seed_user(&pool, "Chef", "chef@example.com", Role::Admin).await;

    let (_, day_ids) =
        common::seed_week(&pool, 2024, 47, common::monday_of_week_47_2024()).await;
    let mut shift_ids = Vec::new();
    for day_id in &day_ids {
        shift_ids.push(common::seed_shift(&pool, *day_id, mette.id, ShiftType::AtWork).await);
    }

    let app = api_app!(&pool);

    let req = test::TestRequest::post()
        .uri("/api/ferieplan/requests")
        .insert_header(("x-user-email", "mette@example.com"))
        .set_json(json!({
            "startDate": "2024-11-20",
            "endDate": "2024-11-21"
        }))
        .to_request();
    let created: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    let request_id = created["id"].as_i64().unwrap();

    // A plain user may not decide
    let req = test::TestRequest::put()
        .uri(&format!("/api/ferieplan/requests/{}/approve", request_id))
        .insert_header(("x-user-email", "mette@example.com"))
        .set_json(json!({
            "status": "approved",
            "shiftAction": "day-off",
            "userId": mette.id
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::put()
        .uri(&format!("/api/ferieplan/requests/{}/approve", request_id))
        .insert_header(("x-user-email", "chef@example.com"))
        .set_json(json!({
            "status": "approved",
            "shiftAction": "day-off",
            "userId": mette.id
        }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["updatedRequest"]["status"], "approved");
    assert_eq!(body["updatedShifts"], 2);

    assert_eq!(common::shift_state(&pool, shift_ids[2]).await.0, "day-off");
    assert_eq!(common::shift_state(&pool, shift_ids[3]).await.0, "day-off");
    assert_eq!(common::shift_state(&pool, shift_ids[4]).await.0, "at-work");
}

#[sqlx::test(migrations = "./migrations")]
async fn shift_updates_validate_their_input(pool: PgPool) {
    let mette = common::seed_user(&pool, "Mette", "mette@example.com", Role::User).await;
    let (_, day_ids) =
        common::seed_week(&pool, 2024, 47, common::monday_of_week_47_2024()).await;
    let shift_id = common::seed_shift(&pool, day_ids[0], mette.id, ShiftType::AtWork).await;

    let app = api_app!(&pool);

    // Working shifts must carry hours
    let req = test::TestRequest::put()
        .uri(&format!("/api/shifts/{}", shift_id))
        .insert_header(("x-user-email", "mette@example.com"))
        .set_json(json!({
            "type": "at-work",
            "userId": mette.id
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Negative breaks are refused
    let req = test::TestRequest::put()
        .uri(&format!("/api/shifts/{}", shift_id))
        .insert_header(("x-user-email", "mette@example.com"))
        .set_json(json!({
            "type": "at-work",
            "startTime": "2024-11-18T08:00:00Z",
            "endTime": "2024-11-18T16:00:00Z",
            "breakMinutes": -15,
            "userId": mette.id
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // A valid update marks the shift as touched
    let req = test::TestRequest::put()
        .uri(&format!("/api/shifts/{}", shift_id))
        .insert_header(("x-user-email", "mette@example.com"))
        .set_json(json!({
            "type": "sick-leave",
            "userId": mette.id
        }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["type"], "sick-leave");
    assert_eq!(body["status"], "updated");
}

#[sqlx::test(migrations = "./migrations")]
async fn role_endpoint_resolves_known_users(pool: PgPool) {
    common::seed_user(&pool, "Chef", "chef@example.com", Role::Admin).await;
    let app = api_app!(&pool);

    let req = test::TestRequest::post()
        .uri("/api/users/role")
        .insert_header(("x-user-email", "chef@example.com"))
        .set_json(json!({ "email": "chef@example.com" }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["role"], "admin");

    let req = test::TestRequest::post()
        .uri("/api/users/role")
        .insert_header(("x-user-email", "chef@example.com"))
        .set_json(json!({ "email": "ghost@example.com" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn only_admins_manage_users_over_http(pool: PgPool) {
    common::seed_user(&pool, "Mette", "mette@example.com", Role::User).await;
    common::seed_user(&pool, "Chef", "chef@example.com", Role::Admin).await;
    let app = api_app!(&pool);

    let req = test::TestRequest::post()
        .uri("/api/users")
        .insert_header(("x-user-email", "mette@example.com"))
        .set_json(json!({ "name": "Lars", "email": "lars@example.com" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::post()
        .uri("/api/users")
        .insert_header(("x-user-email", "chef@example.com"))
        .set_json(json!({ "name": "Lars", "email": "lars@example.com" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    // The new user is addressable by email as well as by id
    let req = test::TestRequest::get()
        .uri("/api/users/lars@example.com")
        .insert_header(("x-user-email", "chef@example.com"))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["name"], "Lars");
}
