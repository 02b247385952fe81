use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::team::{CreateTeamRequest, JoinTeamRequest, RegisterEventRequest, TeamResponse},
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::middleware::auth::Identity;

use super::services;

#[utoipa::path(
    get,
    path = "/api/teams",
    responses(
        (status = 200, description = "List all teams", body = Vec<TeamResponse>)
    ),
    tag = "teams"
)]
pub async fn list_teams(State(db): State<Database>) -> Result<Response, WebError> {
    let teams = services::list_teams(db.pool()).await?;

    Ok(Json(teams).into_response())
}

#[utoipa::path(
    get,
    path = "/api/teams/{id}",
    params(
        ("id" = Uuid, Path, description = "Team ID")
    ),
    responses(
        (status = 200, description = "Team found", body = TeamResponse),
        (status = 404, description = "Team not found")
    ),
    tag = "teams"
)]
pub async fn get_team(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let team = services::get_team(db.pool(), id).await?;

    Ok(Json(team).into_response())
}

#[utoipa::path(
    get,
    path = "/api/teams/code/{code}",
    params(
        ("code" = String, Path, description = "Team join code")
    ),
    responses(
        (status = 200, description = "Team found", body = TeamResponse),
        (status = 404, description = "Team not found")
    ),
    tag = "teams"
)]
pub async fn get_team_by_code(
    State(db): State<Database>,
    Path(code): Path<String>,
) -> Result<Response, WebError> {
    let team = services::get_team_by_code(db.pool(), &code).await?;

    Ok(Json(team).into_response())
}

#[utoipa::path(
    get,
    path = "/api/teams/user/{user_id}",
    params(
        ("user_id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Teams the user belongs to", body = Vec<TeamResponse>)
    ),
    tag = "teams"
)]
pub async fn get_teams_by_user(
    State(db): State<Database>,
    Path(user_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let teams = services::get_teams_by_user(db.pool(), user_id).await?;

    Ok(Json(teams).into_response())
}

#[utoipa::path(
    get,
    path = "/api/teams/event/{event_id}",
    params(
        ("event_id" = Uuid, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Teams registered for the event", body = Vec<TeamResponse>)
    ),
    tag = "teams"
)]
pub async fn get_teams_by_event(
    State(db): State<Database>,
    Path(event_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let teams = services::get_teams_by_event(db.pool(), event_id).await?;

    Ok(Json(teams).into_response())
}

#[utoipa::path(
    post,
    path = "/api/teams",
    request_body = CreateTeamRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Team created", body = TeamResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Cannot create a team for another user"),
        (status = 404, description = "Leader or event not found"),
        (status = 409, description = "Team code taken or event full")
    ),
    tag = "teams"
)]
pub async fn create_team(
    State(db): State<Database>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<CreateTeamRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let team = services::create_team(db.pool(), &identity, &req).await?;

    Ok((StatusCode::CREATED, Json(team)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/teams/join",
    request_body = JoinTeamRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Joined team", body = TeamResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Cannot join on behalf of another user"),
        (status = 404, description = "Team or user not found"),
        (status = 409, description = "User already in team")
    ),
    tag = "teams"
)]
pub async fn join_team(
    State(db): State<Database>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<JoinTeamRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let team = services::join_team(db.pool(), &identity, &req.team_code, req.user_id).await?;

    Ok(Json(team).into_response())
}

#[utoipa::path(
    post,
    path = "/api/teams/{id}/events",
    params(
        ("id" = Uuid, Path, description = "Team ID")
    ),
    request_body = RegisterEventRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Team registered for the event", body = TeamResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only the team leader may register"),
        (status = 404, description = "Team or event not found"),
        (status = 409, description = "Already registered or event full")
    ),
    tag = "teams"
)]
pub async fn register_event(
    State(db): State<Database>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
    Json(req): Json<RegisterEventRequest>,
) -> Result<Response, WebError> {
    let team = services::register_event(db.pool(), &identity, id, req.event_id).await?;

    Ok(Json(team).into_response())
}
