// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers.

pub mod auth;
pub mod catways;
pub mod pages;
pub mod reservations;
pub mod users;

use crate::error::{AppError, Result};
use crate::middleware::{require_auth, require_session};
use crate::AppState;
use axum::http::{header, Method, StatusCode};
use axum::{extract::State, middleware, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Envelope for every JSON API response.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn data(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: None,
            data: Some(data),
        })
    }

    pub fn with_message(message: impl Into<String>, data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        })
    }

    /// `201 Created` with the new resource.
    pub fn created(message: impl Into<String>, data: T) -> (StatusCode, Json<Self>) {
        (StatusCode::CREATED, Self::with_message(message, data))
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            message: Some(message.into()),
            data: None,
        })
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub store: String,
    pub build_id: String,
}

/// Health check response
async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let build_id = option_env!("BUILD_ID").unwrap_or("unknown").to_string();
    Json(HealthResponse {
        status: "ok".to_string(),
        store: state.db.backend_name().to_string(),
        build_id,
    })
}

async fn route_not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}

/// Parse a catway number taken from a URL path segment.
pub(crate) fn parse_catway_number(raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| AppError::Validation(format!("'{}' is not a valid catway number", raw)))
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    // Any origin; bearer tokens only, no cross-origin cookies.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]);

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .merge(auth::routes())
        .merge(users::public_routes())
        .merge(pages::public_routes());

    // Protected API routes (bearer token required)
    let protected_routes = Router::new()
        .merge(users::routes())
        .merge(catways::routes())
        .merge(reservations::routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // Staff pages (session cookie required)
    let page_routes = pages::routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(page_routes)
        .fallback(route_not_found)
        .layer(middleware::from_fn(
            crate::middleware::security::add_security_headers,
        ))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
