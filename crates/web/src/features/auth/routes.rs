use axum::{Router, routing::post};

use super::handlers::{login, signup};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}
