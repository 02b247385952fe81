use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{Role, User};

/// Request payload for creating an account
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(email(message = "Email must be a valid address"))]
    #[validate(length(max = 255))]
    pub email: String,

    #[validate(length(
        min = 6,
        max = 128,
        message = "Password must be between 6 and 128 characters"
    ))]
    pub password: String,

    pub role: Role,

    #[validate(length(min = 1, max = 255))]
    pub company_name: Option<String>,
}

/// Request payload for logging in
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Issued token together with the identity it was issued for
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user_id: Uuid,
    pub role: Role,
}

/// Public view of an account
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
    pub points: i64,
    pub company_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            email: user.email,
            role: user.role,
            points: user.points,
            company_name: user.company_name,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: i64,
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
    pub points: i64,
}

/// Manual points adjustment for a single user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AwardPointsRequest {
    pub user_id: Uuid,
    pub points: i64,
}

impl AwardPointsRequest {
    pub const MAX_ADJUSTMENT: i64 = 1000;

    pub fn validate(&self) -> Result<(), String> {
        if self.points == 0 {
            return Err("points must not be zero".to_string());
        }
        if self.points.abs() > Self::MAX_ADJUSTMENT {
            return Err(format!(
                "points must be between -{0} and {0}",
                Self::MAX_ADJUSTMENT
            ));
        }
        Ok(())
    }
}
