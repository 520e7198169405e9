use actix_cors::Cors;
use actix_web::{get, middleware::Logger, web, App, HttpResponse, HttpServer, Responder};
use anyhow::Result;

use vagtplan_api::database::{
    init_database,
    repositories::{HolidayRepository, ScheduleRepository, ShiftRepository, UserRepository},
};
use vagtplan_api::handlers::{ferieplan, schedule, session, shifts, users};
use vagtplan_api::middleware::AccessControl;
use vagtplan_api::services::{AccessGate, AccessPolicy, HolidayService, ScheduleService};
use vagtplan_api::Config;

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now()
    }))
}

#[actix_web::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init();

    println!("🚀 Starting Vagtplan API server...");

    // Load configuration
    let config = Config::from_env()?;
    println!(
        "📋 Configuration loaded (environment: {})",
        config.environment
    );

    // Initialize database
    let pool = init_database(&config.database_url).await?;
    println!("✅ Database initialized");

    // Initialize repositories and services
    let user_repository = UserRepository::new(pool.clone());
    let schedule_repository = ScheduleRepository::new(pool.clone());
    let shift_repository = ShiftRepository::new(pool.clone());
    let holiday_repository = HolidayRepository::new(pool.clone());

    let schedule_service = ScheduleService::new(schedule_repository);
    let holiday_service = HolidayService::new(holiday_repository, user_repository.clone());
    let access_gate = AccessGate::new(
        AccessPolicy::from_config(&config),
        user_repository.clone(),
    );

    let user_repo_data = web::Data::new(user_repository);
    let shift_repo_data = web::Data::new(shift_repository);
    let schedule_service_data = web::Data::new(schedule_service);
    let holiday_service_data = web::Data::new(holiday_service);
    let access_gate_data = web::Data::new(access_gate.clone());
    let config_data = web::Data::new(config.clone());

    let server_address = config.server_address();
    println!("🌐 Server starting on http://{}", server_address);

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            .app_data(user_repo_data.clone())
            .app_data(shift_repo_data.clone())
            .app_data(schedule_service_data.clone())
            .app_data(holiday_service_data.clone())
            .app_data(access_gate_data.clone())
            .app_data(config_data.clone())
            .wrap(
                Cors::default()
                    .allowed_origin(&config.client_base_url)
                    .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                    .allowed_headers(vec![
                        "Authorization",
                        "Content-Type",
                        "Accept",
                        "X-Requested-With",
                        "X-User-Email",
                    ])
                    .max_age(3600),
            )
            .wrap(AccessControl::new(access_gate.clone()))
            .wrap(Logger::default())
            .service(health)
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
                                "/requests/{id}/approve",
                                web::delete().to(ferieplan::delete_request),
                            )
                            .route(
                                "/requests/{id}/edit",
                                web::put().to(ferieplan::edit_request),
                            )
                            .route("/user", web::get().to(ferieplan::my_requests)),
                    )
                    .route("/signout", web::post().to(session::signout)),
            )
    })
    .bind(&server_address)?
    .run()
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
