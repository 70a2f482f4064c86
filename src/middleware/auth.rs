// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JWT authentication middleware for the JSON API.

use crate::error::AppError;
use crate::models::UserSummary;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Validity window of an issued token.
pub const TOKEN_TTL_HOURS: i64 = 24;

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// User email
    pub email: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Authenticated user extracted from JWT.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub email: String,
}

/// Pull the token out of the `Authorization` header. Accepts
/// `Bearer <token>` and a bare token.
fn token_from_header(request: &Request) -> Option<&str> {
    let value = request
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .trim();
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    (!token.is_empty()).then_some(token)
}

/// Middleware that requires valid JWT authentication.
///
/// Every failure (missing header, bad signature, expired token) produces the
/// same `Unauthorized` error before the handler runs.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = token_from_header(&request).ok_or(AppError::Unauthorized)?;

    let claims = verify_jwt(token, &state.config.jwt_signing_key).map_err(|e| {
        tracing::debug!(error = %e, "Rejected bearer token");
        AppError::Unauthorized
    })?;

    let auth_user = AuthUser {
        user_id: claims.sub,
        email: claims.email,
    };
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Create a JWT for a user, valid for [`TOKEN_TTL_HOURS`] from `issued_at`.
pub fn create_jwt(
    user: &UserSummary,
    signing_key: &[u8],
    issued_at: DateTime<Utc>,
) -> anyhow::Result<String> {
    use jsonwebtoken::{encode, EncodingKey, Header};

    let expires_at = issued_at + Duration::hours(TOKEN_TTL_HOURS);

    let claims = Claims {
        sub: user.id.clone(),
        email: user.email.clone(),
        iat: usize::try_from(issued_at.timestamp())?,
        exp: usize::try_from(expires_at.timestamp())?,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}

/// Verify signature and expiry of a token.
pub fn verify_jwt(token: &str, signing_key: &[u8]) -> jsonwebtoken::errors::Result<Claims> {
    let key = DecodingKey::from_secret(signing_key);
    let validation = Validation::new(Algorithm::HS256);
    decode::<Claims>(token, &key, &validation).map(|data| data.claims)
}
