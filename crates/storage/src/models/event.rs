use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
pub enum EventCategory {
    Technical,
    Indoor,
    Outdoor,
    #[serde(rename = "Fun Sports")]
    #[sqlx(rename = "Fun Sports")]
    FunSports,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub event_id: Uuid,
    pub name: String,
    pub category: EventCategory,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub location: String,
    pub participant_limit: i32,
    pub description: Option<String>,
    pub scoring_criteria: Option<String>,
    pub created_at: DateTime<Utc>,
}
