use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use storage::models::Role;
use uuid::Uuid;

use crate::config::MAX_TOKEN_TTL_DAYS;
use crate::error::WebError;

/// Signed token payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// Caller identity, resolved per request from the bearer token and handed
/// to handlers as an `Extension`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub role: Role,
}

impl Identity {
    pub fn require_admin(&self) -> Result<(), WebError> {
        if self.role.is_admin() {
            Ok(())
        } else {
            Err(WebError::Forbidden("Admin role required".to_string()))
        }
    }

    pub fn require_judge(&self) -> Result<(), WebError> {
        if self.role.can_judge() {
            Ok(())
        } else {
            Err(WebError::Forbidden("Judge role required".to_string()))
        }
    }

    /// Allow acting on `user_id` only for that user or an admin.
    pub fn require_self_or_admin(&self, user_id: Uuid) -> Result<(), WebError> {
        if self.user_id == user_id || self.role.is_admin() {
            Ok(())
        } else {
            Err(WebError::Forbidden(
                "Cannot act on behalf of another user".to_string(),
            ))
        }
    }
}

/// HS256 signing and verification keys shared by all handlers.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenKeys {
    /// `ttl_days` is clamped to the configurable maximum.
    pub fn new(secret: &str, ttl_days: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::days(ttl_days.clamp(-MAX_TOKEN_TTL_DAYS, MAX_TOKEN_TTL_DAYS)),
        }
    }

    pub fn issue(&self, user_id: Uuid, role: Role) -> Result<String, WebError> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| WebError::InternalServerError("Token expiry overflowed".to_string()))?;
        let claims = Claims {
            sub: user_id.to_string(),
            role,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| WebError::InternalServerError(format!("Failed to sign token: {}", e)))
    }

    pub fn verify(&self, token: &str) -> Result<Identity, WebError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(|e| {
                tracing::warn!("Rejected token: {}", e);
                WebError::Unauthorized("Invalid or expired token".to_string())
            })?;

        let user_id = Uuid::parse_str(&data.claims.sub)
            .map_err(|_| WebError::Unauthorized("Invalid or expired token".to_string()))?;

        Ok(Identity {
            user_id,
            role: data.claims.role,
        })
    }
}

/// Reject requests without a valid bearer token; otherwise attach the
/// caller's `Identity` to the request.
pub async fn require_auth(
    State(keys): State<TokenKeys>,
    mut req: Request,
    next: Next,
) -> Result<Response, WebError> {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            tracing::warn!("Missing bearer token on {}", req.uri().path());
            WebError::Unauthorized("Missing bearer token".to_string())
        })?;

    let identity = keys.verify(token)?;
    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}
