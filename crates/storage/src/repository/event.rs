use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::dto::event::{CreateEventRequest, UpdateEventRequest};
use crate::error::{Result, StorageError};
use crate::models::Event;

/// Repository for Event database operations
pub struct EventRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> EventRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List all events, soonest first
    pub async fn list(&self) -> Result<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>(
            r#"
            SELECT event_id, name, category, start_date, end_date, location,
                   participant_limit, description, scoring_criteria, created_at
            FROM events
            ORDER BY start_date, name
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(events)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Event> {
        sqlx::query_as::<_, Event>(
            r#"
            SELECT event_id, name, category, start_date, end_date, location,
                   participant_limit, description, scoring_criteria, created_at
            FROM events
            WHERE event_id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound("Event"))
    }

    pub async fn create(&self, req: &CreateEventRequest) -> Result<Event> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (
                event_id, name, category, start_date, end_date, location,
                participant_limit, description, scoring_criteria, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING event_id, name, category, start_date, end_date, location,
                      participant_limit, description, scoring_criteria, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&req.name)
        .bind(req.category)
        .bind(req.start_date)
        .bind(req.end_date)
        .bind(&req.location)
        .bind(req.participant_limit)
        .bind(&req.description)
        .bind(&req.scoring_criteria)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await?;

        Ok(event)
    }

    /// Apply a partial update on top of `existing`.
    ///
    /// The limit cannot drop below the number of teams already registered.
    pub async fn update(&self, existing: &Event, req: &UpdateEventRequest) -> Result<Event> {
        let start_date = req.start_date.unwrap_or(existing.start_date);
        let end_date = req.end_date.unwrap_or(existing.end_date);

        if end_date < start_date {
            return Err(StorageError::Validation(
                "End date must not be before start date".to_string(),
            ));
        }

        let name = req.name.as_ref().unwrap_or(&existing.name);
        let category = req.category.unwrap_or(existing.category);
        let location = req.location.as_ref().unwrap_or(&existing.location);
        let participant_limit = req.participant_limit.unwrap_or(existing.participant_limit);
        let description = req.description.as_ref().or(existing.description.as_ref());
        let scoring_criteria = req
            .scoring_criteria
            .as_ref()
            .or(existing.scoring_criteria.as_ref());

        let mut tx = self.pool.begin().await?;

        let registered: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM team_events WHERE event_id = ?")
                .bind(existing.event_id)
                .fetch_one(&mut *tx)
                .await?;

        if i64::from(participant_limit) < registered {
            return Err(StorageError::ConstraintViolation(
                "Event has more teams than the new limit".to_string(),
            ));
        }

        let event = sqlx::query_as::<_, Event>(
            r#"
            UPDATE events
            SET name = ?,
                category = ?,
                start_date = ?,
                end_date = ?,
                location = ?,
                participant_limit = ?,
                description = ?,
                scoring_criteria = ?
            WHERE event_id = ?
            RETURNING event_id, name, category, start_date, end_date, location,
                      participant_limit, description, scoring_criteria, created_at
            "#,
        )
        .bind(name)
        .bind(category)
        .bind(start_date)
        .bind(end_date)
        .bind(location)
        .bind(participant_limit)
        .bind(description)
        .bind(scoring_criteria)
        .bind(existing.event_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StorageError::NotFound("Event"))?;

        tx.commit().await?;

        Ok(event)
    }

    /// Delete an event. Team registrations and any judging result go with it.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM events WHERE event_id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound("Event"));
        }

        Ok(())
    }
}
