use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::user::{AuthResponse, LoginRequest, SignupRequest},
};
use validator::Validate;

use crate::error::WebError;
use crate::middleware::auth::TokenKeys;

use super::services;

#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "An admin account already exists"),
        (status = 409, description = "Email already registered")
    ),
    tag = "auth"
)]
pub async fn signup(
    State(db): State<Database>,
    State(keys): State<TokenKeys>,
    Json(req): Json<SignupRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let response = services::signup(db.pool(), &keys, req).await?;

    Ok((StatusCode::CREATED, Json(response)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    State(db): State<Database>,
    State(keys): State<TokenKeys>,
    Json(req): Json<LoginRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let response = services::login(db.pool(), &keys, req).await?;

    Ok(Json(response).into_response())
}
