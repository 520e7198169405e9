use serde::{Deserialize, Serialize};

/// Reference data seeded by migration; shifts optionally point at one.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct JobType {
    pub id: i64,
    pub name: String,
    pub color: String,
}
