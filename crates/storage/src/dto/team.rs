use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::TeamMember;
use crate::services::team_code;

/// Request payload for registering a new team for an event.
///
/// When `team_code` is omitted the server generates one.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamRequest {
    #[validate(custom(function = "validate_team_code"))]
    pub team_code: Option<String>,

    pub team_leader_id: Uuid,

    pub event_id: Uuid,

    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
}

/// Request payload for joining a team by its code
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JoinTeamRequest {
    #[validate(custom(function = "validate_team_code"))]
    pub team_code: String,

    pub user_id: Uuid,
}

/// Request payload for entering an existing team into another event
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterEventRequest {
    pub event_id: Uuid,
}

/// Team with members resolved to display fields
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamResponse {
    pub team_id: Uuid,
    pub team_code: String,
    pub name: Option<String>,
    pub team_leader: TeamMember,
    pub members: Vec<TeamMember>,
    pub events: Vec<Uuid>,
    pub score: i64,
    pub created_at: DateTime<Utc>,
}

fn validate_team_code(code: &str) -> Result<(), ValidationError> {
    if team_code::is_valid(&team_code::normalize(code)) {
        Ok(())
    } else {
        let mut error = ValidationError::new("invalid_team_code");
        error.message =
            Some("Team code must be 4 to 12 letters or digits".into());
        Err(error)
    }
}
