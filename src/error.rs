// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Incorrect email or password")]
    InvalidCredentials,

    #[error("Authentication required")]
    Unauthorized,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// HTTP status for this error, shared by the JSON API and the pages.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidCredentials | AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Database(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to a client. Store and internal failures are
    /// logged and replaced with a fixed string.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                "Storage is temporarily unavailable".to_string()
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }

    /// True for errors caused by the caller's input rather than the system.
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            success: false,
            message: self.public_message(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => format!("{} is invalid", field),
                })
            })
            .collect();
        messages.sort();
        messages.dedup();
        AppError::Validation(messages.join("; "))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
