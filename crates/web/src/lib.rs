use std::time::Duration;

use axum::{Router, extract::FromRef};
use storage::Database;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod config;
pub mod error;
pub mod features;
pub mod middleware;

use middleware::auth::TokenKeys;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub tokens: TokenKeys,
}

impl FromRef<AppState> for Database {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl FromRef<AppState> for TokenKeys {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        features::auth::handlers::signup,
        features::auth::handlers::login,
        features::events::handlers::list_events,
        features::events::handlers::get_event,
        features::events::handlers::create_event,
        features::events::handlers::update_event,
        features::events::handlers::delete_event,
        features::teams::handlers::list_teams,
        features::teams::handlers::get_team,
        features::teams::handlers::get_team_by_code,
        features::teams::handlers::get_teams_by_user,
        features::teams::handlers::get_teams_by_event,
        features::teams::handlers::create_team,
        features::teams::handlers::join_team,
        features::teams::handlers::register_event,
        features::users::handlers::get_leaderboard,
        features::users::handlers::get_user,
        features::users::handlers::award_points,
        features::scoring::handlers::judge_event,
        features::scoring::handlers::get_standings,
    ),
    components(
        schemas(
            storage::dto::user::SignupRequest,
            storage::dto::user::LoginRequest,
            storage::dto::user::AuthResponse,
            storage::dto::user::UserResponse,
            storage::dto::user::LeaderboardEntry,
            storage::dto::user::AwardPointsRequest,
            storage::dto::event::CreateEventRequest,
            storage::dto::event::UpdateEventRequest,
            storage::dto::team::CreateTeamRequest,
            storage::dto::team::JoinTeamRequest,
            storage::dto::team::RegisterEventRequest,
            storage::dto::team::TeamResponse,
            storage::dto::scoring::JudgeEventRequest,
            storage::dto::scoring::AwardSummary,
            storage::dto::scoring::ScoringResponse,
            storage::dto::scoring::StandingEntry,
            storage::dto::scoring::EventStandingsResponse,
            storage::models::Event,
            storage::models::EventCategory,
            storage::models::EventResult,
            storage::models::Role,
            storage::models::TeamMember,
            storage::services::scoring::Place,
        )
    ),
    tags(
        (name = "auth", description = "Signup and login"),
        (name = "events", description = "Event catalogue, managed by admins"),
        (name = "teams", description = "Team registration and membership"),
        (name = "users", description = "User profiles and the leaderboard"),
        (name = "scoring", description = "Judging and per-event standings"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

/// Build the full application router
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(features::routes(&state))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
