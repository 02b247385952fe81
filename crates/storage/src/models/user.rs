use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::Role;

/// Stored account. Carries the password hash, so it is never serialized;
/// responses go through `dto::user::UserResponse`.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub user_id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub points: i64,
    pub company_name: Option<String>,
    pub created_at: DateTime<Utc>,
}
