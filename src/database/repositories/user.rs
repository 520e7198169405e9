use anyhow::Result;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::{
    models::{CreateUserInput, Role, UpdateUserInput, User},
    utils::sql,
};

const USER_COLUMNS: &str = "id, name, email, role, phone, employment_date, \
     primary_position, secondary_position, salary_number, hourly_wage, \
     sick_hourly_wage, prio_list, created_at, updated_at";

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_user(&self, input: CreateUserInput) -> Result<User> {
        let now = Utc::now();

        let user = sqlx::query_as::<_, User>(&sql(&format!(
            r#"
            INSERT INTO
                users (
                    name,
                    email,
                    role,
                    phone,
                    employment_date,
                    primary_position,
                    secondary_position,
                    salary_number,
                    hourly_wage,
                    sick_hourly_wage,
                    prio_list,
                    created_at,
                    updated_at
                )
            VALUES
                (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING
                {USER_COLUMNS}
        "#
        )))
        .bind(input.name)
        .bind(input.email)
        .bind(input.role.unwrap_or_default())
        .bind(input.phone)
        .bind(input.employment_date)
        .bind(input.primary_position)
        .bind(input.secondary_position)
        .bind(input.salary_number)
        .bind(input.hourly_wage)
        .bind(input.sick_hourly_wage)
        .bind(input.prio_list.unwrap_or(false))
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Partial update; absent input fields keep their stored value.
    pub async fn update_user(&self, id: Uuid, input: UpdateUserInput) -> Result<Option<User>> {
        let now = Utc::now();

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET
                name = COALESCE($1, name),
                email = COALESCE($2, email),
                role = COALESCE($3, role),
                phone = COALESCE($4, phone),
                employment_date = COALESCE($5, employment_date),
                primary_position = COALESCE($6, primary_position),
                secondary_position = COALESCE($7, secondary_position),
                salary_number = COALESCE($8, salary_number),
                hourly_wage = COALESCE($9, hourly_wage),
                sick_hourly_wage = COALESCE($10, sick_hourly_wage),
                prio_list = COALESCE($11, prio_list),
                updated_at = $12
            WHERE id = $13
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(input.name)
        .bind(input.email)
        .bind(input.role)
        .bind(input.phone)
        .bind(input.employment_date)
        .bind(input.primary_position)
        .bind(input.secondary_position)
        .bind(input.salary_number)
        .bind(input.hourly_wage)
        .bind(input.sick_hourly_wage)
        .bind(input.prio_list)
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Deletes a user; owned shifts and holiday requests go with it via
    /// the schema's cascade edges.
    pub async fn delete_user(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn role_of(&self, email: &str) -> Result<Option<Role>> {
        let role: Option<Role> = sqlx::query_scalar("SELECT role FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(role)
    }
}
