use axum::{
    Extension, Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::scoring::{EventStandingsResponse, JudgeEventRequest, ScoringResponse},
};
use uuid::Uuid;

use crate::error::WebError;
use crate::middleware::auth::Identity;

use super::services;

#[utoipa::path(
    post,
    path = "/api/scoring/events/{event_id}",
    params(
        ("event_id" = Uuid, Path, description = "Event ID")
    ),
    request_body = JudgeEventRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Podium recorded and points awarded", body = ScoringResponse),
        (status = 400, description = "Podium repeats a team or names an unregistered team"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Judge role required"),
        (status = 404, description = "Event not found"),
        (status = 409, description = "Event already judged")
    ),
    tag = "scoring"
)]
pub async fn judge_event(
    State(db): State<Database>,
    Extension(identity): Extension<Identity>,
    Path(event_id): Path<Uuid>,
    Json(req): Json<JudgeEventRequest>,
) -> Result<Response, WebError> {
    identity.require_judge()?;

    let response = services::judge_event(db.pool(), event_id, identity.user_id, &req).await?;

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/scoring/events/{event_id}",
    params(
        ("event_id" = Uuid, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Standings for the event", body = EventStandingsResponse),
        (status = 404, description = "Event not found")
    ),
    tag = "scoring"
)]
pub async fn get_standings(
    State(db): State<Database>,
    Path(event_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let standings = services::get_standings(db.pool(), event_id).await?;

    Ok(Json(standings).into_response())
}
