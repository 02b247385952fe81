use axum::{
    Extension, Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::user::{AwardPointsRequest, LeaderboardEntry, UserResponse},
};
use uuid::Uuid;

use crate::error::WebError;
use crate::middleware::auth::Identity;

use super::services;

#[utoipa::path(
    get,
    path = "/api/users/board",
    responses(
        (status = 200, description = "Top ten users by points, admins excluded", body = Vec<LeaderboardEntry>)
    ),
    tag = "users"
)]
pub async fn get_leaderboard(State(db): State<Database>) -> Result<Response, WebError> {
    let board = services::get_leaderboard(db.pool()).await?;

    Ok(Json(board).into_response())
}

#[utoipa::path(
    get,
    path = "/api/users/{user_id}",
    params(
        ("user_id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found")
    ),
    tag = "users"
)]
pub async fn get_user(
    State(db): State<Database>,
    Path(user_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let user = services::get_user(db.pool(), user_id).await?;

    Ok(Json(UserResponse::from(user)).into_response())
}

#[utoipa::path(
    put,
    path = "/api/users/points",
    request_body = AwardPointsRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Points applied", body = UserResponse),
        (status = 400, description = "Invalid points value"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Judge role required"),
        (status = 404, description = "User not found")
    ),
    tag = "users"
)]
pub async fn award_points(
    State(db): State<Database>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<AwardPointsRequest>,
) -> Result<Response, WebError> {
    identity.require_judge()?;
    req.validate().map_err(WebError::BadRequest)?;

    let user = services::award_points(db.pool(), identity.user_id, &req).await?;

    Ok(Json(UserResponse::from(user)).into_response())
}
