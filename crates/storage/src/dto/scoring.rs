use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::Result;
use crate::models::EventResult;
use crate::services::scoring::{Place, Podium};

/// Judge's podium selection for one event
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct JudgeEventRequest {
    pub first: Uuid,
    pub second: Uuid,
    pub third: Uuid,
}

impl JudgeEventRequest {
    pub fn podium(&self) -> Result<Podium> {
        Podium::new(self.first, self.second, self.third)
    }
}

/// Points applied to one podium team
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AwardSummary {
    pub place: Place,
    pub team_id: Uuid,
    pub team_code: String,
    pub points: i64,
    pub team_score: i64,
    pub members_awarded: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoringResponse {
    pub event_id: Uuid,
    pub awards: Vec<AwardSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StandingEntry {
    pub rank: i64,
    pub team_id: Uuid,
    pub team_code: String,
    pub name: Option<String>,
    pub score: i64,
    pub member_count: i64,
}

/// Teams entered in an event, best score first, and the podium once judged
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventStandingsResponse {
    pub event_id: Uuid,
    pub judged: bool,
    pub result: Option<EventResult>,
    pub teams: Vec<StandingEntry>,
}
