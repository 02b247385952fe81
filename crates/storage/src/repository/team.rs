use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

use crate::dto::team::{CreateTeamRequest, TeamResponse};
use crate::error::{Result, StorageError};
use crate::models::{Team, TeamMember};
use crate::services::team_code;

/// How many generated codes to try before giving up on a create.
pub const MAX_CODE_ATTEMPTS: usize = 5;

pub struct TeamRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> TeamRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<TeamResponse>> {
        let teams = sqlx::query_as::<_, Team>(
            r#"
            SELECT team_id, team_code, name, team_leader_id, score, created_at
            FROM teams
            ORDER BY created_at, team_code
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        self.details(teams).await
    }

    /// Bare team row, without members or events
    pub async fn find_team(&self, id: Uuid) -> Result<Team> {
        sqlx::query_as::<_, Team>(
            r#"
            SELECT team_id, team_code, name, team_leader_id, score, created_at
            FROM teams
            WHERE team_id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound("Team"))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<TeamResponse> {
        let team = self.find_team(id).await?;
        self.detail(team).await
    }

    /// Look a team up by its join code, in any letter case
    pub async fn find_by_code(&self, code: &str) -> Result<TeamResponse> {
        let team = self.find_team_by_code(&team_code::normalize(code)).await?;
        self.detail(team).await
    }

    /// Teams the user leads or has joined
    pub async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<TeamResponse>> {
        let teams = sqlx::query_as::<_, Team>(
            r#"
            SELECT t.team_id, t.team_code, t.name, t.team_leader_id, t.score, t.created_at
            FROM teams t
            JOIN team_members tm ON tm.team_id = t.team_id
            WHERE tm.user_id = ?
            ORDER BY t.created_at, t.team_code
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        self.details(teams).await
    }

    pub async fn list_by_event(&self, event_id: Uuid) -> Result<Vec<TeamResponse>> {
        let teams = sqlx::query_as::<_, Team>(
            r#"
            SELECT t.team_id, t.team_code, t.name, t.team_leader_id, t.score, t.created_at
            FROM teams t
            JOIN team_events te ON te.team_id = t.team_id
            WHERE te.event_id = ?
            ORDER BY te.registered_at, t.team_code
            "#,
        )
        .bind(event_id)
        .fetch_all(self.pool)
        .await?;

        self.details(teams).await
    }

    /// Create a team led by `team_leader_id` and entered in `event_id`.
    ///
    /// An explicit code that is already taken is a conflict. Without one, fresh
    /// codes are generated until one sticks or `MAX_CODE_ATTEMPTS` is reached.
    pub async fn create(&self, req: &CreateTeamRequest) -> Result<TeamResponse> {
        let team_id = match &req.team_code {
            Some(code) => self
                .try_insert(&team_code::normalize(code), req)
                .await?
                .ok_or_else(|| {
                    StorageError::ConstraintViolation("Team code already in use".to_string())
                })?,
            None => {
                let mut created = None;
                for attempt in 1..=MAX_CODE_ATTEMPTS {
                    let code = team_code::generate();
                    if let Some(team_id) = self.try_insert(&code, req).await? {
                        created = Some(team_id);
                        break;
                    }
                    tracing::warn!(attempt, code = %code, "Generated team code collided");
                }
                created.ok_or_else(|| {
                    StorageError::ConstraintViolation(
                        "Could not allocate a unique team code".to_string(),
                    )
                })?
            }
        };

        self.find_by_id(team_id).await
    }

    /// Insert team, leader membership and event entry in one transaction.
    /// Returns `None` when `code` is already taken.
    async fn try_insert(&self, code: &str, req: &CreateTeamRequest) -> Result<Option<Uuid>> {
        let mut tx = self.pool.begin().await?;

        ensure_user_exists(&mut tx, req.team_leader_id).await?;
        ensure_capacity(&mut tx, req.event_id).await?;

        let team_id = Uuid::new_v4();
        let now = Utc::now();

        let inserted = sqlx::query(
            r#"
            INSERT INTO teams (team_id, team_code, name, team_leader_id, score, created_at)
            VALUES (?, ?, ?, ?, 0, ?)
            "#,
        )
        .bind(team_id)
        .bind(code)
        .bind(&req.name)
        .bind(req.team_leader_id)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(StorageError::from);

        match inserted {
            Err(e) if e.is_unique_violation() => return Ok(None),
            Err(e) => return Err(e),
            Ok(_) => {}
        }

        sqlx::query("INSERT INTO team_members (team_id, user_id, joined_at) VALUES (?, ?, ?)")
            .bind(team_id)
            .bind(req.team_leader_id)
            .bind(now)
            .execute(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO team_events (team_id, event_id, registered_at) VALUES (?, ?, ?)")
            .bind(team_id)
            .bind(req.event_id)
            .bind(now)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(%team_id, team_code = code, "Team created");

        Ok(Some(team_id))
    }

    /// Add `user_id` to the team holding `code`.
    ///
    /// The membership insert is conditional on the `(team_id, user_id)` key,
    /// so two concurrent joins by the same user cannot both succeed.
    pub async fn join(&self, code: &str, user_id: Uuid) -> Result<TeamResponse> {
        let team = self.find_team_by_code(&team_code::normalize(code)).await?;

        let mut conn = self.pool.acquire().await?;
        ensure_user_exists(&mut conn, user_id).await?;

        let result = sqlx::query(
            r#"
            INSERT INTO team_members (team_id, user_id, joined_at)
            VALUES (?, ?, ?)
            ON CONFLICT (team_id, user_id) DO NOTHING
            "#,
        )
        .bind(team.team_id)
        .bind(user_id)
        .bind(Utc::now())
        .execute(&mut *conn)
        .await?;
        drop(conn);

        if result.rows_affected() == 0 {
            return Err(StorageError::ConstraintViolation(
                "User already in team".to_string(),
            ));
        }

        self.detail(team).await
    }

    /// Enter an existing team in another event
    pub async fn register_event(&self, team_id: Uuid, event_id: Uuid) -> Result<TeamResponse> {
        let mut tx = self.pool.begin().await?;

        let already_registered: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM team_events WHERE team_id = ? AND event_id = ?)",
        )
        .bind(team_id)
        .bind(event_id)
        .fetch_one(&mut *tx)
        .await?;

        if already_registered {
            return Err(StorageError::ConstraintViolation(
                "Team is already registered for this event".to_string(),
            ));
        }

        ensure_capacity(&mut tx, event_id).await?;

        let result = sqlx::query(
            "INSERT INTO team_events (team_id, event_id, registered_at) VALUES (?, ?, ?)",
        )
        .bind(team_id)
        .bind(event_id)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(StorageError::from);

        match result {
            Err(e) if e.is_foreign_key_violation() => return Err(StorageError::NotFound("Team")),
            Err(e) => return Err(e),
            Ok(_) => {}
        }

        tx.commit().await?;

        self.find_by_id(team_id).await
    }

    async fn find_team_by_code(&self, code: &str) -> Result<Team> {
        sqlx::query_as::<_, Team>(
            r#"
            SELECT team_id, team_code, name, team_leader_id, score, created_at
            FROM teams
            WHERE team_code = ?
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound("Team"))
    }

    async fn details(&self, teams: Vec<Team>) -> Result<Vec<TeamResponse>> {
        let mut responses = Vec::with_capacity(teams.len());
        for team in teams {
            responses.push(self.detail(team).await?);
        }
        Ok(responses)
    }

    /// Resolve leader, members and events for a team row
    async fn detail(&self, team: Team) -> Result<TeamResponse> {
        let team_leader = sqlx::query_as::<_, TeamMember>(
            "SELECT user_id, email FROM users WHERE user_id = ?",
        )
        .bind(team.team_leader_id)
        .fetch_one(self.pool)
        .await?;

        // rowid follows insertion order, so members come back in join order
        let members = sqlx::query_as::<_, TeamMember>(
            r#"
            SELECT u.user_id, u.email
            FROM team_members tm
            JOIN users u ON u.user_id = tm.user_id
            WHERE tm.team_id = ?
            ORDER BY tm.rowid
            "#,
        )
        .bind(team.team_id)
        .fetch_all(self.pool)
        .await?;

        let events = sqlx::query_scalar::<_, Uuid>(
            "SELECT event_id FROM team_events WHERE team_id = ? ORDER BY rowid",
        )
        .bind(team.team_id)
        .fetch_all(self.pool)
        .await?;

        Ok(TeamResponse {
            team_id: team.team_id,
            team_code: team.team_code,
            name: team.name,
            team_leader,
            members,
            events,
            score: team.score,
            created_at: team.created_at,
        })
    }
}

async fn ensure_user_exists(conn: &mut SqliteConnection, user_id: Uuid) -> Result<()> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE user_id = ?)")
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await?;

    if exists {
        Ok(())
    } else {
        Err(StorageError::NotFound("User"))
    }
}

/// The event's participant limit caps how many teams may be entered in it.
async fn ensure_capacity(conn: &mut SqliteConnection, event_id: Uuid) -> Result<()> {
    let limit: i64 = sqlx::query_scalar("SELECT participant_limit FROM events WHERE event_id = ?")
        .bind(event_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(StorageError::NotFound("Event"))?;

    let registered: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM team_events WHERE event_id = ?")
        .bind(event_id)
        .fetch_one(&mut *conn)
        .await?;

    if registered >= limit {
        return Err(StorageError::ConstraintViolation("Event is full".to_string()));
    }

    Ok(())
}
