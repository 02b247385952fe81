use sqlx::SqlitePool;
use storage::{
    dto::scoring::{EventStandingsResponse, JudgeEventRequest, ScoringResponse},
    error::Result,
    repository::scoring::ScoringRepository,
};
use uuid::Uuid;

/// Award podium points for an event; see `ScoringRepository::judge_event`
pub async fn judge_event(
    pool: &SqlitePool,
    event_id: Uuid,
    judge_id: Uuid,
    request: &JudgeEventRequest,
) -> Result<ScoringResponse> {
    let podium = request.podium()?;

    let repo = ScoringRepository::new(pool);
    repo.judge_event(event_id, &podium, judge_id).await
}

pub async fn get_standings(pool: &SqlitePool, event_id: Uuid) -> Result<EventStandingsResponse> {
    let repo = ScoringRepository::new(pool);
    repo.standings(event_id).await
}
