use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::dto::scoring::{AwardSummary, EventStandingsResponse, ScoringResponse, StandingEntry};
use crate::error::{Result, StorageError};
use crate::models::EventResult;
use crate::services::scoring::{Place, Podium};

/// Number of teams shown in per-event standings.
pub const STANDINGS_SIZE: i64 = 5;

pub struct ScoringRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ScoringRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Record the podium for an event and hand out the points.
    ///
    /// Everything happens in a single transaction: the event is marked as
    /// judged, each podium team's score is incremented, and every current
    /// member of that team receives the same increment. Any failure leaves
    /// all scores untouched.
    pub async fn judge_event(
        &self,
        event_id: Uuid,
        podium: &Podium,
        judge_id: Uuid,
    ) -> Result<ScoringResponse> {
        let mut tx = self.pool.begin().await?;

        let event_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM events WHERE event_id = ?)")
                .bind(event_id)
                .fetch_one(&mut *tx)
                .await?;
        if !event_exists {
            return Err(StorageError::NotFound("Event"));
        }

        for (place, team_id) in podium.placements() {
            let registered: bool = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM team_events WHERE team_id = ? AND event_id = ?)",
            )
            .bind(team_id)
            .bind(event_id)
            .fetch_one(&mut *tx)
            .await?;

            if !registered {
                return Err(StorageError::Validation(format!(
                    "Team {} picked for {:?} place is not registered for this event",
                    team_id, place
                )));
            }
        }

        let recorded = sqlx::query(
            r#"
            INSERT INTO event_results (
                event_id, first_team_id, second_team_id, third_team_id, judged_by, judged_at
            )
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(event_id)
        .bind(podium.team_for(Place::First))
        .bind(podium.team_for(Place::Second))
        .bind(podium.team_for(Place::Third))
        .bind(judge_id)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(StorageError::from);

        match recorded {
            Err(e) if e.is_unique_violation() => {
                return Err(StorageError::ConstraintViolation(
                    "Event has already been judged".to_string(),
                ));
            }
            Err(e) if e.is_foreign_key_violation() => return Err(StorageError::NotFound("User")),
            Err(e) => return Err(e),
            Ok(_) => {}
        }

        let mut awards = Vec::with_capacity(3);

        for (place, team_id) in podium.placements() {
            let points = place.points();

            let (team_code, team_score): (String, i64) = sqlx::query_as(
                r#"
                UPDATE teams
                SET score = score + ?
                WHERE team_id = ?
                RETURNING team_code, score
                "#,
            )
            .bind(points)
            .bind(team_id)
            .fetch_one(&mut *tx)
            .await?;

            let members = sqlx::query(
                r#"
                UPDATE users
                SET points = points + ?
                WHERE user_id IN (SELECT user_id FROM team_members WHERE team_id = ?)
                "#,
            )
            .bind(points)
            .bind(team_id)
            .execute(&mut *tx)
            .await?;

            awards.push(AwardSummary {
                place,
                team_id,
                team_code,
                points,
                team_score,
                members_awarded: members.rows_affected(),
            });
        }

        tx.commit().await?;

        tracing::info!(%event_id, %judge_id, "Event judged");

        Ok(ScoringResponse { event_id, awards })
    }

    pub async fn find_result(&self, event_id: Uuid) -> Result<Option<EventResult>> {
        let result = sqlx::query_as::<_, EventResult>(
            r#"
            SELECT event_id, first_team_id, second_team_id, third_team_id, judged_by, judged_at
            FROM event_results
            WHERE event_id = ?
            "#,
        )
        .bind(event_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(result)
    }

    /// Teams entered in the event, best score first
    pub async fn standings(&self, event_id: Uuid) -> Result<EventStandingsResponse> {
        let event_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM events WHERE event_id = ?)")
                .bind(event_id)
                .fetch_one(self.pool)
                .await?;
        if !event_exists {
            return Err(StorageError::NotFound("Event"));
        }

        let rows = sqlx::query_as::<_, (Uuid, String, Option<String>, i64, i64)>(
            r#"
            SELECT t.team_id, t.team_code, t.name, t.score,
                   (SELECT COUNT(*) FROM team_members tm WHERE tm.team_id = t.team_id)
            FROM teams t
            JOIN team_events te ON te.team_id = t.team_id
            WHERE te.event_id = ?
            ORDER BY t.score DESC, t.team_code ASC
            LIMIT ?
            "#,
        )
        .bind(event_id)
        .bind(STANDINGS_SIZE)
        .fetch_all(self.pool)
        .await?;

        let teams = rows
            .into_iter()
            .zip(1..)
            .map(
                |((team_id, team_code, name, score, member_count), rank)| StandingEntry {
                    rank,
                    team_id,
                    team_code,
                    name,
                    score,
                    member_count,
                },
            )
            .collect();

        let result = self.find_result(event_id).await?;

        Ok(EventStandingsResponse {
            event_id,
            judged: result.is_some(),
            result,
            teams,
        })
    }
}
