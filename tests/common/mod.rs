// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use port_office::config::Config;
use port_office::db::FirestoreDb;
use port_office::routes::create_router;
use port_office::AppState;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

/// Credentials of the account created by [`create_logged_in_app`].
#[allow(dead_code)]
pub const STAFF_EMAIL: &str = "capitainerie@port.test";
#[allow(dead_code)]
pub const STAFF_PASSWORD: &str = "amarrage42";

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a test app over `db`.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_app_with_db(db: FirestoreDb) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(Config::default(), db));
    (create_router(state.clone()), state)
}

/// Create a test app backed by an empty in-memory store.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_app_with_db(FirestoreDb::new_in_memory())
}

/// Create a test app whose store is offline.
#[allow(dead_code)]
pub fn create_offline_app() -> (axum::Router, Arc<AppState>) {
    create_app_with_db(FirestoreDb::new_mock())
}

/// In-memory app with one registered staff account and a bearer token for it.
#[allow(dead_code)]
pub async fn create_logged_in_app() -> (axum::Router, Arc<AppState>, String) {
    let (app, state) = create_test_app();
    let response = send(
        &app,
        json_request(
            "POST",
            "/api/users",
            None,
            Some(json!({
                "username": "Capitainerie",
                "email": STAFF_EMAIL,
                "password": STAFF_PASSWORD,
            })),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let token = login_token(&app, STAFF_EMAIL, STAFF_PASSWORD).await;
    (app, state, token)
}

/// Build a JSON request, optionally with a bearer token.
#[allow(dead_code)]
pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Build a URL-encoded form POST, optionally carrying a cookie header.
#[allow(dead_code)]
pub fn form_request(uri: &str, cookie: Option<&str>, fields: &[(&str, &str)]) -> Request<Body> {
    let body = fields
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body)).unwrap()
}

/// GET with an optional cookie header.
#[allow(dead_code)]
pub fn page_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

#[allow(dead_code)]
pub async fn send(app: &axum::Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

#[allow(dead_code)]
pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[allow(dead_code)]
pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Log in through the API and return the bearer token.
#[allow(dead_code)]
pub async fn login_token(app: &axum::Router, email: &str, password: &str) -> String {
    let response = send(
        app,
        json_request(
            "POST",
            "/api/login",
            None,
            Some(json!({ "email": email, "password": password })),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"]["token"]
        .as_str()
        .unwrap()
        .to_string()
}

/// `name=value` part of the first `Set-Cookie` header.
#[allow(dead_code)]
pub fn session_cookie(response: &Response) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}
