use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::database::{
    models::{HolidayRequest, HolidayRequestWithUser, HolidayStatus},
    utils::sql,
};

const REQUEST_COLUMNS: &str = "id, user_id, start_date, end_date, reason, status, \
     decided_by, decision_reason, created_at, updated_at";

#[derive(Clone)]
pub struct HolidayRepository {
    pool: PgPool,
}

impl HolidayRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create a new holiday request in the pending state
    pub async fn create_request(
        &self,
        user_id: Uuid,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        reason: Option<String>,
    ) -> Result<HolidayRequest> {
        let now = Utc::now();

        let request = sqlx::query_as::<_, HolidayRequest>(&sql(&format!(
            r#"
            INSERT INTO
                holiday_requests (
                    user_id,
                    start_date,
                    end_date,
                    reason,
                    status,
                    created_at,
                    updated_at
                )
            VALUES
                (?, ?, ?, ?, ?, ?, ?)
            RETURNING
                {REQUEST_COLUMNS}
        "#
        )))
        .bind(user_id)
        .bind(start_date)
        .bind(end_date)
        .bind(reason)
        .bind(HolidayStatus::Pending)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(request)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<HolidayRequest>> {
        let request = sqlx::query_as::<_, HolidayRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM holiday_requests WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    /// Admin listing, newest first, optionally narrowed to one status.
    pub async fn list_all(
        &self,
        status: Option<HolidayStatus>,
    ) -> Result<Vec<HolidayRequestWithUser>> {
        let mut query = format!(
            r#"
            SELECT
                r.id, r.user_id, r.start_date, r.end_date, r.reason, r.status,
                r.decided_by, r.decision_reason, r.created_at, r.updated_at,
                u.name AS user_name
            FROM
                holiday_requests r
                JOIN users u ON u.id = r.user_id
            "#
        );

        if status.is_some() {
            query.push_str(" WHERE r.status = $1");
        }

        query.push_str(" ORDER BY r.created_at DESC");

        let mut prepared = sqlx::query_as::<_, HolidayRequestWithUser>(&query);
        if let Some(s) = status {
            prepared = prepared.bind(s);
        }

        let requests = prepared.fetch_all(&self.pool).await?;

        Ok(requests)
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<HolidayRequest>> {
        let requests = sqlx::query_as::<_, HolidayRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM holiday_requests WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    /// Rewrite the request's dates and reason. Editing puts the request
    /// back in the pending state and wipes any earlier decision.
    pub async fn update_fields(
        &self,
        id: i64,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        reason: Option<String>,
    ) -> Result<HolidayRequest> {
        let now = Utc::now();

        let request = sqlx::query_as::<_, HolidayRequest>(&format!(
            r#"
            UPDATE holiday_requests
            SET
                start_date = $1,
                end_date = $2,
                reason = $3,
                status = $4,
                decided_by = NULL,
                decision_reason = NULL,
                updated_at = $5
            WHERE id = $6
            RETURNING {REQUEST_COLUMNS}
            "#
        ))
        .bind(start_date)
        .bind(end_date)
        .bind(reason)
        .bind(HolidayStatus::Pending)
        .bind(now)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(request)
    }

    /// Record an admin decision. Runs on a caller-owned connection so the
    /// workflow can commit it atomically with the shift side effect.
    pub async fn decide(
        conn: &mut PgConnection,
        id: i64,
        status: HolidayStatus,
        decided_by: Uuid,
        decision_reason: Option<String>,
    ) -> Result<HolidayRequest> {
        let now = Utc::now();

        let request = sqlx::query_as::<_, HolidayRequest>(&format!(
            r#"
            UPDATE holiday_requests
            SET
                status = $1,
                decided_by = $2,
                decision_reason = $3,
                updated_at = $4
            WHERE id = $5
            RETURNING {REQUEST_COLUMNS}
            "#
        ))
        .bind(status)
        .bind(decided_by)
        .bind(decision_reason)
        .bind(now)
        .bind(id)
        .fetch_one(conn)
        .await?;

        Ok(request)
    }

    pub async fn delete_request(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM holiday_requests WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
