// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User account API.

use crate::error::Result;
use crate::models::{NewUserInput, UserSummary, UserUpdateInput};
use crate::routes::ApiResponse;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

/// Registration is open.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/users", post(create_user))
}

/// Routes behind the bearer gate (applied in routes/mod.rs).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/users", get(list_users)).route(
        "/api/users/{email}",
        get(get_user).put(update_user).delete(delete_user),
    )
}

async fn create_user(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<NewUserInput>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<UserSummary>>)> {
    let Json(input) = payload?;
    let user = state.users.create_user(input).await?;
    Ok(ApiResponse::created("User created", user))
}

async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse<Vec<UserSummary>>>> {
    Ok(ApiResponse::data(state.users.list_users().await?))
}

async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<ApiResponse<UserSummary>>> {
    Ok(ApiResponse::data(state.users.get_user(&email).await?))
}

/// Update username/email. A `password` field in the body is ignored.
async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
    payload: std::result::Result<Json<UserUpdateInput>, JsonRejection>,
) -> Result<Json<ApiResponse<UserSummary>>> {
    let Json(input) = payload?;
    let user = state.users.update_user(&email, input).await?;
    Ok(ApiResponse::with_message("User updated", user))
}

async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    state.users.delete_user(&email).await?;
    Ok(ApiResponse::message(format!("User {} deleted", email)))
}
