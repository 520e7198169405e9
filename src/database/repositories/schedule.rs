use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{
    Day, JobType, ShiftDetail, ShiftStatus, ShiftType, UserSummary, Week,
};

/// Flat join row; regrouped into nested `ShiftDetail` values in memory.
#[derive(sqlx::FromRow)]
struct WeekShiftRow {
    id: i64,
    day_id: i64,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
    shift_type: ShiftType,
    break_minutes: i32,
    status: ShiftStatus,
    user_id: Uuid,
    user_name: String,
    user_email: String,
    job_type_id: Option<i64>,
    job_type_name: Option<String>,
    job_type_color: Option<String>,
}

impl From<WeekShiftRow> for ShiftDetail {
    fn from(row: WeekShiftRow) -> Self {
        let job_type = match (row.job_type_id, row.job_type_name, row.job_type_color) {
            (Some(id), Some(name), Some(color)) => Some(JobType { id, name, color }),
            _ => None,
        };

        ShiftDetail {
            id: row.id,
            day_id: row.day_id,
            start_time: row.start_time,
            end_time: row.end_time,
            shift_type: row.shift_type,
            break_minutes: row.break_minutes,
            status: row.status,
            user: UserSummary {
                id: row.user_id,
                name: row.user_name,
                email: row.user_email,
            },
            job_type,
        }
    }
}

#[derive(Clone)]
pub struct ScheduleRepository {
    pool: PgPool,
}

impl ScheduleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_week(&self, year: i32, week_number: i32) -> Result<Option<Week>> {
        let week = sqlx::query_as::<_, Week>(
            "SELECT id, week_number, year FROM weeks WHERE week_number = $1 AND year = $2",
        )
        .bind(week_number)
        .bind(year)
        .fetch_optional(&self.pool)
        .await?;

        Ok(week)
    }

    /// Existence probe for navigation; a missing week is a normal outcome.
    pub async fn week_exists(&self, year: i32, week_number: i32) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM weeks WHERE week_number = $1 AND year = $2)",
        )
        .bind(week_number)
        .bind(year)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Resolves the legacy week-number-only lookup to its most recent year.
    pub async fn latest_year_for_week(&self, week_number: i32) -> Result<Option<i32>> {
        let year: Option<i32> =
            sqlx::query_scalar("SELECT MAX(year) FROM weeks WHERE week_number = $1")
                .bind(week_number)
                .fetch_one(&self.pool)
                .await?;

        Ok(year)
    }

    pub async fn days_for_week(&self, week_id: i64) -> Result<Vec<Day>> {
        let days = sqlx::query_as::<_, Day>(
            "SELECT id, week_id, name, date FROM days WHERE week_id = $1 ORDER BY date",
        )
        .bind(week_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(days)
    }

    /// All shifts of one week with user and job type joined, ordered by
    /// day then start time with null start times first.
    pub async fn shifts_for_week(&self, week_id: i64) -> Result<Vec<ShiftDetail>> {
        let rows = sqlx::query_as::<_, WeekShiftRow>(
            r#"
            SELECT
                s.id,
                s.day_id,
                s.start_time,
                s.end_time,
                s.shift_type,
                s.break_minutes,
                s.status,
                u.id AS user_id,
                u.name AS user_name,
                u.email AS user_email,
                j.id AS job_type_id,
                j.name AS job_type_name,
                j.color AS job_type_color
            FROM
                shifts s
                JOIN days d ON d.id = s.day_id
                JOIN users u ON u.id = s.user_id
                LEFT JOIN job_types j ON j.id = s.job_type_id
            WHERE
                d.week_id = $1
            ORDER BY
                d.date, s.start_time ASC NULLS FIRST, s.id
            "#,
        )
        .bind(week_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ShiftDetail::from).collect())
    }
}
