use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::models::EventCategory;

/// Request payload for creating a new event
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_create_dates"))]
pub struct CreateEventRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1 and 255 characters"
    ))]
    pub name: String,

    pub category: EventCategory,

    pub start_date: NaiveDate,

    pub end_date: NaiveDate,

    #[validate(length(min = 1, max = 255, message = "Location is required"))]
    pub location: String,

    #[validate(range(min = 1, message = "Participant limit must be at least 1"))]
    pub participant_limit: i32,

    #[validate(length(max = 4000))]
    pub description: Option<String>,

    #[validate(length(max = 4000))]
    pub scoring_criteria: Option<String>,
}

/// Request payload for updating an existing event
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,

    pub category: Option<EventCategory>,

    pub start_date: Option<NaiveDate>,

    pub end_date: Option<NaiveDate>,

    #[validate(length(min = 1, max = 255))]
    pub location: Option<String>,

    #[validate(range(min = 1))]
    pub participant_limit: Option<i32>,

    #[validate(length(max = 4000))]
    pub description: Option<String>,

    #[validate(length(max = 4000))]
    pub scoring_criteria: Option<String>,
}

fn validate_create_dates(req: &CreateEventRequest) -> Result<(), ValidationError> {
    if req.end_date < req.start_date {
        let mut error = ValidationError::new("date_range");
        error.message = Some("End date must not be before start date".into());
        return Err(error);
    }
    Ok(())
}
