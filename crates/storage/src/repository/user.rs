use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::dto::user::LeaderboardEntry;
use crate::error::{Result, StorageError};
use crate::models::{Role, User};

/// Number of entries returned by the leaderboard.
pub const LEADERBOARD_SIZE: i64 = 10;

pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create an account. `email` is expected in its normalised (lowercase) form.
    pub async fn create(
        &self,
        email: &str,
        password_hash: &str,
        role: Role,
        company_name: Option<&str>,
    ) -> Result<User> {
        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (user_id, email, password_hash, role, points, company_name, created_at)
            VALUES (?, ?, ?, ?, 0, ?, ?)
            RETURNING user_id, email, password_hash, role, points, company_name, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .bind(company_name)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await
        .map_err(StorageError::from);

        match result {
            Err(e) if e.is_unique_violation() => Err(StorageError::ConstraintViolation(
                "User already exists".to_string(),
            )),
            other => other,
        }
    }

    /// Create the first admin account. Returns `None` once any admin exists.
    pub async fn create_first_admin(
        &self,
        email: &str,
        password_hash: &str,
        company_name: Option<&str>,
    ) -> Result<Option<User>> {
        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (user_id, email, password_hash, role, points, company_name, created_at)
            SELECT ?, ?, ?, ?, 0, ?, ?
            WHERE NOT EXISTS (SELECT 1 FROM users WHERE role = 'admin')
            RETURNING user_id, email, password_hash, role, points, company_name, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(password_hash)
        .bind(Role::Admin)
        .bind(company_name)
        .bind(Utc::now())
        .fetch_optional(self.pool)
        .await
        .map_err(StorageError::from);

        match result {
            Err(e) if e.is_unique_violation() => Err(StorageError::ConstraintViolation(
                "User already exists".to_string(),
            )),
            other => other,
        }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, email, password_hash, role, points, company_name, created_at
            FROM users
            WHERE user_id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound("User"))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, email, password_hash, role, points, company_name, created_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Top non-admin users by points, ties broken by email
    pub async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>> {
        let rows = sqlx::query_as::<_, (Uuid, String, Role, i64)>(
            r#"
            SELECT user_id, email, role, points
            FROM users
            WHERE role <> 'admin'
            ORDER BY points DESC, email ASC
            LIMIT ?
            "#,
        )
        .bind(LEADERBOARD_SIZE)
        .fetch_all(self.pool)
        .await?;

        let entries = rows
            .into_iter()
            .zip(1..)
            .map(|((user_id, email, role, points), rank)| LeaderboardEntry {
                rank,
                user_id,
                email,
                role,
                points,
            })
            .collect();

        Ok(entries)
    }

    /// Atomically add `points` (which may be negative) to a user's total
    pub async fn add_points(&self, id: Uuid, points: i64) -> Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET points = points + ?
            WHERE user_id = ?
            RETURNING user_id, email, password_hash, role, points, company_name, created_at
            "#,
        )
        .bind(points)
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound("User"))
    }
}
