use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Row of the `teams` table. Members and events live in join tables.
#[derive(Debug, Clone, FromRow)]
pub struct Team {
    pub team_id: Uuid,
    pub team_code: String,
    pub name: Option<String>,
    pub team_leader_id: Uuid,
    pub score: i64,
    pub created_at: DateTime<Utc>,
}

/// Display projection of a user inside a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub user_id: Uuid,
    pub email: String,
}
