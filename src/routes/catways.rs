// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Catway API.

use crate::error::Result;
use crate::models::{Catway, CatwayInput, CatwayUpdate};
use crate::routes::{parse_catway_number, ApiResponse};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use std::sync::Arc;

/// Catway routes (require authentication via JWT).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/catways", get(list_catways).post(create_catway))
        .route(
            "/api/catways/{id}",
            get(get_catway).put(update_catway).delete(delete_catway),
        )
}

async fn list_catways(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse<Vec<Catway>>>> {
    Ok(ApiResponse::data(state.catways.list().await?))
}

async fn get_catway(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Catway>>> {
    let catway_number = parse_catway_number(&id)?;
    Ok(ApiResponse::data(state.catways.get(catway_number).await?))
}

async fn create_catway(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<CatwayInput>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Catway>>)> {
    let Json(input) = payload?;
    let catway = state.catways.create(input).await?;
    Ok(ApiResponse::created("Catway created", catway))
}

/// Only `catwayState` is applied; number and type in the body are ignored.
async fn update_catway(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<CatwayUpdate>, JsonRejection>,
) -> Result<Json<ApiResponse<Catway>>> {
    let catway_number = parse_catway_number(&id)?;
    let Json(input) = payload?;
    let catway = state.catways.update(catway_number, input).await?;
    Ok(ApiResponse::with_message("Catway updated", catway))
}

async fn delete_catway(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    let catway_number = parse_catway_number(&id)?;
    state.catways.delete(catway_number).await?;
    Ok(ApiResponse::message(format!(
        "Catway {} deleted",
        catway_number
    )))
}
