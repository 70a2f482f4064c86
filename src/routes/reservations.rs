// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Reservation API.
//!
//! Item routes are nested under a catway for URL shape only: the reservation
//! is looked up by its own ID and the catway segment is not consulted.

use crate::error::Result;
use crate::models::{Reservation, ReservationInput};
use crate::routes::{parse_catway_number, ApiResponse};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use std::sync::Arc;

/// Reservation routes (require authentication via JWT).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/reservations", get(list_all))
        .route(
            "/api/catways/{id}/reservations",
            get(list_for_catway).post(create_reservation),
        )
        .route(
            "/api/catways/{id}/reservations/{reservation_id}",
            get(get_reservation)
                .put(update_reservation)
                .delete(delete_reservation),
        )
}

async fn list_all(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse<Vec<Reservation>>>> {
    Ok(ApiResponse::data(state.reservations.list().await?))
}

async fn list_for_catway(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<Reservation>>>> {
    let catway_number = parse_catway_number(&id)?;
    Ok(ApiResponse::data(
        state.reservations.list_for_catway(catway_number).await?,
    ))
}

async fn create_reservation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<ReservationInput>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Reservation>>)> {
    let catway_number = parse_catway_number(&id)?;
    let Json(input) = payload?;
    let reservation = state.reservations.create(catway_number, input).await?;
    Ok(ApiResponse::created("Reservation created", reservation))
}

async fn get_reservation(
    State(state): State<Arc<AppState>>,
    Path((_, reservation_id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<Reservation>>> {
    Ok(ApiResponse::data(
        state.reservations.get(&reservation_id).await?,
    ))
}

async fn update_reservation(
    State(state): State<Arc<AppState>>,
    Path((_, reservation_id)): Path<(String, String)>,
    payload: std::result::Result<Json<ReservationInput>, JsonRejection>,
) -> Result<Json<ApiResponse<Reservation>>> {
    let Json(input) = payload?;
    let reservation = state.reservations.update(&reservation_id, input).await?;
    Ok(ApiResponse::with_message("Reservation updated", reservation))
}

async fn delete_reservation(
    State(state): State<Arc<AppState>>,
    Path((_, reservation_id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<()>>> {
    state.reservations.delete(&reservation_id).await?;
    Ok(ApiResponse::message(format!(
        "Reservation {} deleted",
        reservation_id
    )))
}
