use axum::{
    Router, middleware,
    routing::{get, put},
};

use super::handlers::{award_points, get_leaderboard, get_user};
use crate::AppState;
use crate::middleware::auth::{TokenKeys, require_auth};

pub fn routes(keys: TokenKeys) -> Router<AppState> {
    let protected = Router::new()
        .route("/points", put(award_points))
        .route_layer(middleware::from_fn_with_state(keys, require_auth));

    Router::new()
        .route("/board", get(get_leaderboard))
        .route("/:user_id", get(get_user))
        .merge(protected)
}
