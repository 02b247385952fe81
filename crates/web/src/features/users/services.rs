use sqlx::SqlitePool;
use storage::{
    dto::user::{AwardPointsRequest, LeaderboardEntry},
    error::Result,
    models::User,
    repository::user::UserRepository,
};
use uuid::Uuid;

pub async fn get_user(pool: &SqlitePool, id: Uuid) -> Result<User> {
    let repo = UserRepository::new(pool);
    repo.find_by_id(id).await
}

/// Top non-admin users by points
pub async fn get_leaderboard(pool: &SqlitePool) -> Result<Vec<LeaderboardEntry>> {
    let repo = UserRepository::new(pool);
    repo.leaderboard().await
}

/// Add (or with a negative value, remove) points for one user
pub async fn award_points(
    pool: &SqlitePool,
    awarded_by: Uuid,
    request: &AwardPointsRequest,
) -> Result<User> {
    let repo = UserRepository::new(pool);
    let user = repo.add_points(request.user_id, request.points).await?;

    tracing::info!(
        user_id = %user.user_id,
        %awarded_by,
        points = request.points,
        total = user.points,
        "Points adjusted"
    );

    Ok(user)
}
