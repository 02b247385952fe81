use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::SqlitePool;
use storage::{
    dto::user::{AuthResponse, LoginRequest, SignupRequest},
    models::Role,
    repository::user::UserRepository,
};

use crate::error::{WebError, WebResult};
use crate::middleware::auth::TokenKeys;

/// Emails are matched case-insensitively.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Hash off the async runtime; Argon2 is deliberately slow.
pub async fn hash_password(password: String) -> WebResult<String> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| WebError::InternalServerError(format!("Failed to hash password: {}", e)))
    })
    .await
    .map_err(|e| WebError::InternalServerError(format!("Hashing task failed: {}", e)))?
}

pub async fn verify_password(password: String, hash: String) -> WebResult<bool> {
    tokio::task::spawn_blocking(move || {
        let parsed = PasswordHash::new(&hash).map_err(|e| {
            WebError::InternalServerError(format!("Stored password hash is malformed: {}", e))
        })?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    })
    .await
    .map_err(|e| WebError::InternalServerError(format!("Verification task failed: {}", e)))?
}

/// Create an account and sign a token for it.
///
/// Only the first admin may sign up; later admin signups are refused.
pub async fn signup(
    pool: &SqlitePool,
    keys: &TokenKeys,
    request: SignupRequest,
) -> WebResult<AuthResponse> {
    let email = normalize_email(&request.email);
    let password_hash = hash_password(request.password).await?;

    let repo = UserRepository::new(pool);
    let company_name = request.company_name.as_deref();

    let user = match request.role {
        Role::Admin => repo
            .create_first_admin(&email, &password_hash, company_name)
            .await?
            .ok_or_else(|| {
                tracing::warn!(%email, "Refused admin signup");
                WebError::Forbidden("Admin accounts cannot be self-registered".to_string())
            })?,
        Role::Employee | Role::Judge => {
            repo.create(&email, &password_hash, request.role, company_name)
                .await?
        }
    };

    tracing::info!(user_id = %user.user_id, role = %user.role, "User signed up");

    Ok(AuthResponse {
        token: keys.issue(user.user_id, user.role)?,
        user_id: user.user_id,
        role: user.role,
    })
}

/// Check credentials. Unknown email and wrong password are indistinguishable.
pub async fn login(
    pool: &SqlitePool,
    keys: &TokenKeys,
    request: LoginRequest,
) -> WebResult<AuthResponse> {
    let invalid = || WebError::Unauthorized("Invalid credentials".to_string());

    let user = UserRepository::new(pool)
        .find_by_email(&normalize_email(&request.email))
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(request.password, user.password_hash.clone()).await? {
        tracing::warn!(user_id = %user.user_id, "Failed login attempt");
        return Err(invalid());
    }

    Ok(AuthResponse {
        token: keys.issue(user.user_id, user.role)?,
        user_id: user.user_id,
        role: user.role,
    })
}
