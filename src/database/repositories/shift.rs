use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::database::models::{Shift, ShiftStatus, ShiftType};

const SHIFT_COLUMNS: &str = "id, day_id, user_id, job_type_id, start_time, end_time, \
     shift_type, break_minutes, status, created_at, updated_at";

#[derive(Clone)]
pub struct ShiftRepository {
    pool: PgPool,
}

impl ShiftRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Shift>> {
        let shift = sqlx::query_as::<_, Shift>(&format!(
            "SELECT {SHIFT_COLUMNS} FROM shifts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(shift)
    }

    /// Rewrites one shift's times, type, break and assignee. Any manual
    /// edit moves the row off its seeded `default` status.
    #[allow(clippy::too_many_arguments)]
    pub async fn update_shift(
        &self,
        id: i64,
        start_time: Option<DateTime<Utc>>,
        end_time: Option<DateTime<Utc>>,
        shift_type: ShiftType,
        break_minutes: i32,
        user_id: Uuid,
        job_type_id: Option<i64>,
    ) -> Result<Option<Shift>> {
        let now = Utc::now();

        let shift = sqlx::query_as::<_, Shift>(&format!(
            r#"
            UPDATE shifts
            SET
                start_time = $1,
                end_time = $2,
                shift_type = $3,
                break_minutes = $4,
                user_id = $5,
                job_type_id = $6,
                status = $7,
                updated_at = $8
            WHERE id = $9
            RETURNING {SHIFT_COLUMNS}
            "#
        ))
        .bind(start_time)
        .bind(end_time)
        .bind(shift_type)
        .bind(break_minutes)
        .bind(user_id)
        .bind(job_type_id)
        .bind(ShiftStatus::Updated)
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(shift)
    }

    /// Reassigns every shift of one user whose day falls inside the
    /// inclusive date range. Runs on a caller-owned connection so the
    /// holiday workflow can commit it together with the request update.
    pub async fn reassign_in_range(
        conn: &mut PgConnection,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
        shift_type: ShiftType,
    ) -> Result<u64> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE shifts
            SET
                shift_type = $1,
                status = $2,
                updated_at = $3
            WHERE
                user_id = $4
                AND day_id IN (
                    SELECT id FROM days WHERE date >= $5 AND date <= $6
                )
            "#,
        )
        .bind(shift_type)
        .bind(ShiftStatus::Updated)
        .bind(now)
        .bind(user_id)
        .bind(from)
        .bind(to)
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }
}
