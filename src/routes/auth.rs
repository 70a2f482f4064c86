// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API login and logout.

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Redirect,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::routes::ApiResponse;
use crate::services::AuthResult;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/login", post(login))
        .route("/api/logout", get(logout))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    email: Option<String>,
    password: Option<String>,
}

/// Exchange credentials for a bearer token. Also opens a page session so the
/// same browser can use the staff pages.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<ApiResponse<AuthResult>>)> {
    let Json(request) = payload?;
    let (Some(email), Some(password)) = (request.email, request.password) else {
        return Err(AppError::Validation(
            "email and password are required".to_string(),
        ));
    };

    let auth = state.users.authenticate(email.trim(), &password).await?;
    let cookie = state
        .sessions
        .create(auth.user.clone(), auth.token.clone())?;

    Ok((
        jar.add(cookie),
        ApiResponse::with_message("Login successful", auth),
    ))
}

/// Drop the page session (if any) and go back to the login page.
async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> (CookieJar, Redirect) {
    (state.sessions.destroy(jar), Redirect::to("/"))
}
