use sqlx::SqlitePool;
use storage::{
    dto::team::{CreateTeamRequest, TeamResponse},
    repository::team::TeamRepository,
};
use uuid::Uuid;

use crate::error::{WebError, WebResult};
use crate::middleware::auth::Identity;

pub async fn list_teams(pool: &SqlitePool) -> WebResult<Vec<TeamResponse>> {
    Ok(TeamRepository::new(pool).list().await?)
}

pub async fn get_team(pool: &SqlitePool, id: Uuid) -> WebResult<TeamResponse> {
    Ok(TeamRepository::new(pool).find_by_id(id).await?)
}

pub async fn get_team_by_code(pool: &SqlitePool, code: &str) -> WebResult<TeamResponse> {
    Ok(TeamRepository::new(pool).find_by_code(code).await?)
}

pub async fn get_teams_by_user(pool: &SqlitePool, user_id: Uuid) -> WebResult<Vec<TeamResponse>> {
    Ok(TeamRepository::new(pool).list_by_user(user_id).await?)
}

pub async fn get_teams_by_event(
    pool: &SqlitePool,
    event_id: Uuid,
) -> WebResult<Vec<TeamResponse>> {
    Ok(TeamRepository::new(pool).list_by_event(event_id).await?)
}

/// Register a new team; employees may only lead their own teams
pub async fn create_team(
    pool: &SqlitePool,
    identity: &Identity,
    request: &CreateTeamRequest,
) -> WebResult<TeamResponse> {
    identity.require_self_or_admin(request.team_leader_id)?;

    Ok(TeamRepository::new(pool).create(request).await?)
}

pub async fn join_team(
    pool: &SqlitePool,
    identity: &Identity,
    team_code: &str,
    user_id: Uuid,
) -> WebResult<TeamResponse> {
    identity.require_self_or_admin(user_id)?;

    let team = TeamRepository::new(pool).join(team_code, user_id).await?;
    tracing::info!(team_id = %team.team_id, %user_id, "User joined team");
    Ok(team)
}

/// Enter a team in another event; only its leader or an admin may do so
pub async fn register_event(
    pool: &SqlitePool,
    identity: &Identity,
    team_id: Uuid,
    event_id: Uuid,
) -> WebResult<TeamResponse> {
    let repo = TeamRepository::new(pool);

    let team = repo.find_team(team_id).await?;
    if team.team_leader_id != identity.user_id && !identity.role.is_admin() {
        return Err(WebError::Forbidden(
            "Only the team leader can register the team for events".to_string(),
        ));
    }

    Ok(repo.register_event(team_id, event_id).await?)
}
