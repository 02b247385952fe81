use axum::Router;

use crate::AppState;

pub mod auth;
pub mod events;
pub mod scoring;
pub mod teams;
pub mod users;

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .nest("/api/auth", auth::routes::routes())
        .nest("/api/events", events::routes::routes(state.tokens.clone()))
        .nest("/api/teams", teams::routes::routes(state.tokens.clone()))
        .nest("/api/users", users::routes::routes(state.tokens.clone()))
        .nest("/api/scoring", scoring::routes::routes(state.tokens.clone()))
}
