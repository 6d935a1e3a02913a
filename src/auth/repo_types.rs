use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,              // BIGSERIAL primary key
    pub username: String,     // unique
    #[serde(skip_serializing)]
    pub password: String,     // bcrypt hash, not exposed in JSON
}
