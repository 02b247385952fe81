use axum::{
    Router, middleware,
    routing::{get, post},
};

use super::handlers::{get_standings, judge_event};
use crate::AppState;
use crate::middleware::auth::{TokenKeys, require_auth};

pub fn routes(keys: TokenKeys) -> Router<AppState> {
    let protected = Router::new()
        .route("/events/:event_id", post(judge_event))
        .route_layer(middleware::from_fn_with_state(keys, require_auth));

    Router::new()
        .route("/events/:event_id", get(get_standings))
        .merge(protected)
}
