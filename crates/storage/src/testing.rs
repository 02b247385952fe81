use chrono::NaiveDate;
use uuid::Uuid;

use crate::Database;
use crate::dto::event::CreateEventRequest;
use crate::models::{Event, EventCategory, Role, User};
use crate::repository::event::EventRepository;
use crate::repository::user::UserRepository;

pub async fn database() -> Database {
    let db = Database::new("sqlite::memory:").await.unwrap();
    db.run_migrations().await.unwrap();
    db
}

/// A database in a file under `dir`, so several pool connections can race.
pub async fn file_database(dir: &tempfile::TempDir) -> Database {
    let url = format!("sqlite://{}", dir.path().join("events.db").display());
    let db = Database::new(&url).await.unwrap();
    db.run_migrations().await.unwrap();
    db
}

pub async fn user(db: &Database, email: &str, role: Role) -> User {
    UserRepository::new(db.pool())
        .create(email, "not-a-real-hash", role, None)
        .await
        .unwrap()
}

pub async fn event(db: &Database, name: &str, participant_limit: i32) -> Event {
    let day = NaiveDate::from_ymd_opt(2024, 9, 14).unwrap();
    EventRepository::new(db.pool())
        .create(&CreateEventRequest {
            name: name.to_string(),
            category: EventCategory::Outdoor,
            start_date: day,
            end_date: day,
            location: "North field".to_string(),
            participant_limit,
            description: None,
            scoring_criteria: None,
        })
        .await
        .unwrap()
}

pub fn missing_id() -> Uuid {
    Uuid::new_v4()
}
