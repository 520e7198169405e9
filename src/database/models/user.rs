use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub phone: Option<String>,
    pub employment_date: Option<NaiveDate>,
    pub primary_position: Option<String>,
    pub secondary_position: Option<String>,
    pub salary_number: Option<String>,
    pub hourly_wage: Option<BigDecimal>,
    pub sick_hourly_wage: Option<BigDecimal>,
    pub prio_list: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
    #[serde(rename_all = "lowercase")]
    pub enum Role {
        Admin => "admin",
        User => "user",
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateUserInput {
    pub name: String,
    pub email: String,
    pub role: Option<Role>,
    pub phone: Option<String>,
    pub employment_date: Option<NaiveDate>,
    pub primary_position: Option<String>,
    pub secondary_position: Option<String>,
    pub salary_number: Option<String>,
    pub hourly_wage: Option<BigDecimal>,
    pub sick_hourly_wage: Option<BigDecimal>,
    pub prio_list: Option<bool>,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub phone: Option<String>,
    pub employment_date: Option<NaiveDate>,
    pub primary_position: Option<String>,
    pub secondary_position: Option<String>,
    pub salary_number: Option<String>,
    pub hourly_wage: Option<BigDecimal>,
    pub sick_hourly_wage: Option<BigDecimal>,
    pub prio_list: Option<bool>,
}

/// Slim projection embedded in schedule payloads.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}
