// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Staff page tests: session cookie, guard and form handling.

use axum::http::{header, StatusCode};
use common::{body_text, form_request, page_request, send, session_cookie, STAFF_EMAIL, STAFF_PASSWORD};
use port_office::middleware::session::SESSION_COOKIE;

mod common;

/// Log in through the form and return the `Cookie` header value.
async fn page_login(app: &axum::Router) -> String {
    let response = send(
        app,
        form_request(
            "/login",
            None,
            &[("email", STAFF_EMAIL), ("password", STAFF_PASSWORD)],
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/dashboard");
    session_cookie(&response)
}

#[tokio::test]
async fn test_anonymous_pages_redirect_to_login() {
    let (app, _) = common::create_test_app();

    for uri in ["/dashboard", "/catways", "/reservations/new", "/users"] {
        let response = send(&app, page_request(uri, None)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{}", uri);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
    }
}

#[tokio::test]
async fn test_login_page_is_public() {
    let (app, _) = common::create_test_app();

    let response = send(&app, page_request("/", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("content-security-policy"));
    assert!(body_text(response).await.contains(r#"action="/login""#));
}

#[tokio::test]
async fn test_login_sets_http_only_cookie() {
    let (app, state, _) = common::create_logged_in_app().await;
    let sessions_before = state.sessions.len();

    let response = send(
        &app,
        form_request(
            "/login",
            None,
            &[("email", STAFF_EMAIL), ("password", STAFF_PASSWORD)],
        ),
    )
    .await;
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with(&format!("{}=", SESSION_COOKIE)));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));
    assert_eq!(state.sessions.len(), sessions_before + 1);
}

#[tokio::test]
async fn test_bad_login_rerenders_form() {
    let (app, _, _) = common::create_logged_in_app().await;

    let response = send(
        &app,
        form_request("/login", None, &[("email", STAFF_EMAIL), ("password", "nope")]),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(!response.headers().contains_key(header::SET_COOKIE));
    let html = body_text(response).await;
    assert!(html.contains("Incorrect email or password"));
    assert!(html.contains(STAFF_EMAIL));
}

#[tokio::test]
async fn test_dashboard_counts() {
    let (app, state, _) = common::create_logged_in_app().await;
    let cookie = page_login(&app).await;

    for n in [1, 2] {
        state
            .catways
            .create(port_office::models::CatwayInput {
                catway_number: Some(n),
                catway_type: Some("long".to_string()),
                catway_state: None,
            })
            .await
            .unwrap();
    }
    let now = chrono::Utc::now();
    state
        .reservations
        .create(
            1,
            port_office::models::ReservationInput {
                client_name: Some("Marie".to_string()),
                boat_name: Some("Mistral".to_string()),
                start_date: Some((now - chrono::Duration::days(1)).to_rfc3339()),
                end_date: Some((now + chrono::Duration::days(1)).to_rfc3339()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    state
        .reservations
        .create(
            2,
            port_office::models::ReservationInput {
                client_name: Some("Paul".to_string()),
                boat_name: Some("Zephyr".to_string()),
                start_date: Some("2001-01-01".to_string()),
                end_date: Some("2001-01-02".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let response = send(&app, page_request("/dashboard", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("<strong>2</strong><br>catways"));
    assert!(html.contains("<strong>1</strong><br>users"));
    assert!(html.contains("<strong>1</strong><br>active reservations"));
    assert!(html.contains("Mistral"));
    assert!(!html.contains("Zephyr"));
}

#[tokio::test]
async fn test_logged_in_root_redirects_to_dashboard() {
    let (app, _, _) = common::create_logged_in_app().await;
    let cookie = page_login(&app).await;

    let response = send(&app, page_request("/", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/dashboard");
}

#[tokio::test]
async fn test_logout_ends_session() {
    let (app, state, _) = common::create_logged_in_app().await;
    let cookie = page_login(&app).await;
    let open = state.sessions.len();

    let response = send(&app, page_request("/logout", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(state.sessions.len(), open - 1);

    let response = send(&app, page_request("/dashboard", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_tampered_cookie_redirects() {
    let (app, _, _) = common::create_logged_in_app().await;
    let cookie = page_login(&app).await;
    let (id, _) = cookie.rsplit_once('.').unwrap();
    let forged = format!("{}.{}", id, "ab".repeat(32));

    let response = send(&app, page_request("/dashboard", Some(&forged))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_catway_form_flow() {
    let (app, state, _) = common::create_logged_in_app().await;
    let cookie = page_login(&app).await;

    let response = send(
        &app,
        form_request(
            "/catways/new",
            Some(&cookie),
            &[("catwayNumber", "8"), ("catwayType", "short"), ("catwayState", "")],
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/catways");
    assert_eq!(state.catways.get(8).await.unwrap().catway_state, "good condition");

    // Same number again: the form comes back with the conflict message.
    let response = send(
        &app,
        form_request(
            "/catways/new",
            Some(&cookie),
            &[("catwayNumber", "8"), ("catwayType", "long"), ("catwayState", "")],
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert!(body_text(response).await.contains("Catway 8 already exists"));

    let response = send(
        &app,
        form_request("/catways/8/edit", Some(&cookie), &[("catwayState", "x")]),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("catwayState must be between 3 and 200 characters"));

    let response = send(
        &app,
        form_request("/catways/8/edit", Some(&cookie), &[("catwayState", "new decking")]),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(state.catways.get(8).await.unwrap().catway_state, "new decking");

    let response = send(&app, form_request("/catways/8/delete", Some(&cookie), &[])).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(state.catways.get(8).await.is_err());
}

#[tokio::test]
async fn test_reservation_form_rejects_inverted_dates() {
    let (app, state, _) = common::create_logged_in_app().await;
    let cookie = page_login(&app).await;

    let response = send(
        &app,
        form_request(
            "/reservations/new",
            Some(&cookie),
            &[
                ("catwayNumber", "5"),
                ("clientName", "Marie"),
                ("boatName", "Mistral"),
                ("startDate", "2024-06-05T10:00"),
                ("endDate", "2024-06-01T10:00"),
            ],
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let html = body_text(response).await;
    assert!(html.contains("endDate must be after startDate"));
    assert!(html.contains(r#"value="Mistral""#));
    assert!(state.reservations.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_record_renders_error_page() {
    let (app, _, _) = common::create_logged_in_app().await;
    let cookie = page_login(&app).await;

    let response = send(&app, page_request("/catways/404/edit", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("Catway 404 not found"));
}

#[tokio::test]
async fn test_user_pages_escape_and_encode() {
    let (app, state, _) = common::create_logged_in_app().await;
    let cookie = page_login(&app).await;
    state
        .users
        .create_user(port_office::models::NewUserInput {
            username: Some("<script>".to_string()),
            email: Some("a+b@port.test".to_string()),
            password: Some("bollard1".to_string()),
        })
        .await
        .unwrap();

    let response = send(&app, page_request("/users", Some(&cookie))).await;
    let html = body_text(response).await;
    assert!(html.contains("&lt;script&gt;"));
    assert!(!html.contains("<script>"));
    assert!(html.contains("/users/a%2Bb%40port.test/edit"));

    let response = send(
        &app,
        page_request("/users/a%2Bb%40port.test/edit", Some(&cookie)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}
