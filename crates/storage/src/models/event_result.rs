use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Podium recorded when a judge scores an event.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventResult {
    pub event_id: Uuid,
    pub first_team_id: Uuid,
    pub second_team_id: Uuid,
    pub third_team_id: Uuid,
    pub judged_by: Uuid,
    pub judged_at: DateTime<Utc>,
}
