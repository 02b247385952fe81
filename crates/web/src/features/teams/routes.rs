use axum::{
    Router, middleware,
    routing::{get, post},
};

use super::handlers::{
    create_team, get_team, get_team_by_code, get_teams_by_event, get_teams_by_user, join_team,
    list_teams, register_event,
};
use crate::AppState;
use crate::middleware::auth::{TokenKeys, require_auth};

pub fn routes(keys: TokenKeys) -> Router<AppState> {
    let protected = Router::new()
        .route("/", post(create_team))
        .route("/join", post(join_team))
        .route("/:id/events", post(register_event))
        .route_layer(middleware::from_fn_with_state(keys, require_auth));

    Router::new()
        .route("/", get(list_teams))
        .route("/:id", get(get_team))
        .route("/code/:code", get(get_team_by_code))
        .route("/user/:user_id", get(get_teams_by_user))
        .route("/event/:event_id", get(get_teams_by_event))
        .merge(protected)
}
