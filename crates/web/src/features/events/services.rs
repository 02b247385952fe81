use sqlx::SqlitePool;
use storage::{
    dto::event::{CreateEventRequest, UpdateEventRequest},
    error::Result,
    models::Event,
    repository::event::EventRepository,
};
use uuid::Uuid;

/// List all events
pub async fn list_events(pool: &SqlitePool) -> Result<Vec<Event>> {
    let repo = EventRepository::new(pool);
    repo.list().await
}

pub async fn get_event(pool: &SqlitePool, id: Uuid) -> Result<Event> {
    let repo = EventRepository::new(pool);
    repo.find_by_id(id).await
}

pub async fn create_event(pool: &SqlitePool, request: &CreateEventRequest) -> Result<Event> {
    let repo = EventRepository::new(pool);
    let event = repo.create(request).await?;
    tracing::info!(event_id = %event.event_id, name = %event.name, "Event created");
    Ok(event)
}

pub async fn update_event(
    pool: &SqlitePool,
    id: Uuid,
    request: &UpdateEventRequest,
) -> Result<Event> {
    let repo = EventRepository::new(pool);

    let existing = repo.find_by_id(id).await?;
    repo.update(&existing, request).await
}

pub async fn delete_event(pool: &SqlitePool, id: Uuid) -> Result<()> {
    let repo = EventRepository::new(pool);
    repo.delete(id).await?;
    tracing::info!(event_id = %id, "Event deleted");
    Ok(())
}
