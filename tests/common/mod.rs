#![allow(dead_code)]

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use vagtplan_api::database::models::{CreateUserInput, Role, ShiftType, User};
use vagtplan_api::database::repositories::UserRepository;

pub const DAY_NAMES: [&str; 7] = [
    "Mandag", "Tirsdag", "Onsdag", "Torsdag", "Fredag", "Lørdag", "Søndag",
];

pub fn user_input(name: &str, email: &str, role: Role) -> CreateUserInput {
    CreateUserInput {
        name: name.to_string(),
        email: email.to_string(),
        role: Some(role),
        phone: None,
        employment_date: None,
        primary_position: None,
        secondary_position: None,
        salary_number: None,
        hourly_wage: None,
        sick_hourly_wage: None,
        prio_list: None,
    }
}

pub async fn seed_user(pool: &PgPool, name: &str, email: &str, role: Role) -> User {
    UserRepository::new(pool.clone())
        .create_user(user_input(name, email, role))
        .await
        .expect("seed user")
}

/// Creates a week row plus its seven days, Monday first.
pub async fn seed_week(pool: &PgPool, year: i32, week_number: i32, monday: NaiveDate) -> (i64, Vec<i64>) {
    let week_id: i64 = sqlx::query_scalar(
        "INSERT INTO weeks (week_number, year) VALUES ($1, $2) RETURNING id",
    )
    .bind(week_number)
    .bind(year)
    .fetch_one(pool)
    .await
    .expect("seed week");

    let mut day_ids = Vec::with_capacity(7);
    for (offset, name) in DAY_NAMES.iter().enumerate() {
        let date = monday + Duration::days(offset as i64);
        let day_id: i64 = sqlx::query_scalar(
            "INSERT INTO days (week_id, name, date) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(week_id)
        .bind(name)
        .bind(date)
        .fetch_one(pool)
        .await
        .expect("seed day");
        day_ids.push(day_id);
    }

    (week_id, day_ids)
}

/// Adds one shift to a day. Working shifts get 08:00–16:00 on the day's
/// date; absence types are stored without times.
pub async fn seed_shift(
    pool: &PgPool,
    day_id: i64,
    user_id: Uuid,
    shift_type: ShiftType,
) -> i64 {
    let date: NaiveDate = sqlx::query_scalar("SELECT date FROM days WHERE id = $1")
        .bind(day_id)
        .fetch_one(pool)
        .await
        .expect("day date");

    let (start_time, end_time) = if shift_type == ShiftType::AtWork {
        let start = Utc
            .from_utc_datetime(&date.and_hms_opt(8, 0, 0).expect("valid time"));
        let end = Utc.from_utc_datetime(&date.and_hms_opt(16, 0, 0).expect("valid time"));
        (Some(start), Some(end))
    } else {
        (None, None)
    };

    sqlx::query_scalar(
        r#"
        INSERT INTO shifts (day_id, user_id, start_time, end_time, shift_type)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(day_id)
    .bind(user_id)
    .bind(start_time)
    .bind(end_time)
    .bind(shift_type)
    .fetch_one(pool)
    .await
    .expect("seed shift")
}

pub async fn shift_state(pool: &PgPool, shift_id: i64) -> (String, String) {
    sqlx::query_as::<_, (String, String)>(
        "SELECT shift_type, status FROM shifts WHERE id = $1",
    )
    .bind(shift_id)
    .fetch_one(pool)
    .await
    .expect("shift state")
}

pub fn monday_of_week_47_2024() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 11, 18).expect("valid date")
}
