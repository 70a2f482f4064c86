// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Staff pages: login, dashboard and the catway/reservation/user screens.
//!
//! Input errors re-render the submitted form with the message; any other
//! failure renders the error page with the mapped status.

use crate::error::{AppError, Result};
use crate::middleware::session::Session;
use crate::models::{
    CatwayInput, CatwayUpdate, NewUserInput, ReservationInput, UserUpdateInput,
};
use crate::routes::parse_catway_number;
use crate::views::{self, CatwayForm, LoginForm, ReservationForm, UserForm};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Extension, Form, Router,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

/// Login and logout.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(login_page))
        .route("/login", post(login))
        .route("/logout", get(logout))
}

/// Pages behind the session guard (applied in routes/mod.rs).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/catways", get(catway_list))
        .route("/catways/new", get(new_catway).post(create_catway))
        .route("/catways/{number}/edit", get(edit_catway).post(update_catway))
        .route("/catways/{number}/delete", post(delete_catway))
        .route("/reservations", get(reservation_list))
        .route(
            "/reservations/new",
            get(new_reservation).post(create_reservation),
        )
        .route(
            "/reservations/{id}/edit",
            get(edit_reservation).post(update_reservation),
        )
        .route("/reservations/{id}/delete", post(delete_reservation))
        .route("/users", get(user_list))
        .route("/users/new", get(new_user).post(create_user))
        .route("/users/{email}/edit", get(edit_user).post(update_user))
        .route("/users/{email}/delete", post(delete_user))
}

/// HTML rendition of an [`AppError`].
#[derive(Debug)]
pub struct PageError(AppError);

impl From<AppError> for PageError {
    fn from(error: AppError) -> Self {
        Self(error)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let status = self.0.status_code();
        let message = self.0.public_message();
        (
            status,
            Html(views::error_page(None, status.as_u16(), &message)),
        )
            .into_response()
    }
}

type PageResult<T> = std::result::Result<T, PageError>;

/// Re-render a form for input errors; anything else becomes an error page.
fn form_error(error: AppError, render: impl FnOnce(&str) -> String) -> PageResult<Response> {
    match error {
        AppError::Validation(_) | AppError::Conflict(_) => {
            let status = error.status_code();
            Ok((status, Html(render(&error.to_string()))).into_response())
        }
        other => Err(other.into()),
    }
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn optional_number(raw: &str) -> Result<Option<i64>> {
    match raw.trim() {
        "" => Ok(None),
        number => parse_catway_number(number).map(Some),
    }
}

// ─── Login ───────────────────────────────────────────────────

async fn login_page(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    if state.sessions.lookup(&jar).is_some() {
        return Redirect::to("/dashboard").into_response();
    }
    Html(views::login_page(&LoginForm::default(), None)).into_response()
}

async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> PageResult<Response> {
    match state
        .users
        .authenticate(form.email.trim(), &form.password)
        .await
    {
        Ok(auth) => {
            let cookie = state
                .sessions
                .create(auth.user, auth.token)
                .map_err(AppError::from)?;
            Ok((jar.add(cookie), Redirect::to("/dashboard")).into_response())
        }
        Err(e @ AppError::InvalidCredentials) => Ok((
            StatusCode::UNAUTHORIZED,
            Html(views::login_page(&form, Some(&e.to_string()))),
        )
            .into_response()),
        Err(e) => Err(e.into()),
    }
}

async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> (CookieJar, Redirect) {
    (state.sessions.destroy(jar), Redirect::to("/"))
}

// ─── Dashboard ───────────────────────────────────────────────

async fn dashboard(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> PageResult<Html<String>> {
    let catways = state.catways.list().await?;
    let users = state.users.list_users().await?;
    let active = state.reservations.active_at(chrono::Utc::now()).await?;
    Ok(Html(views::dashboard(
        &session.user,
        catways.len(),
        users.len(),
        &active,
    )))
}

// ─── Catways ─────────────────────────────────────────────────

async fn catway_list(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> PageResult<Html<String>> {
    let catways = state.catways.list().await?;
    Ok(Html(views::catway_list(&session.user, &catways)))
}

async fn new_catway(Extension(session): Extension<Session>) -> Html<String> {
    let form = CatwayForm {
        catway_type: "long".to_string(),
        ..CatwayForm::default()
    };
    Html(views::catway_form(&session.user, &form, None, None))
}

async fn create_catway(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Form(form): Form<CatwayForm>,
) -> PageResult<Response> {
    let result = match optional_number(&form.catway_number) {
        Ok(catway_number) => {
            let input = CatwayInput {
                catway_number,
                catway_type: non_empty(&form.catway_type),
                catway_state: non_empty(&form.catway_state),
            };
            state.catways.create(input).await
        }
        Err(e) => Err(e),
    };
    match result {
        Ok(_) => Ok(Redirect::to("/catways").into_response()),
        Err(e) => form_error(e, |msg| {
            views::catway_form(&session.user, &form, None, Some(msg))
        }),
    }
}

async fn edit_catway(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(number): Path<String>,
) -> PageResult<Html<String>> {
    let catway = state.catways.get(parse_catway_number(&number)?).await?;
    Ok(Html(views::catway_form(
        &session.user,
        &CatwayForm::from(&catway),
        Some(catway.catway_number),
        None,
    )))
}

async fn update_catway(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(number): Path<String>,
    Form(form): Form<CatwayForm>,
) -> PageResult<Response> {
    let catway_number = parse_catway_number(&number)?;
    let existing = state.catways.get(catway_number).await?;
    let input = CatwayUpdate {
        catway_state: Some(form.catway_state.clone()),
    };
    match state.catways.update(catway_number, input).await {
        Ok(_) => Ok(Redirect::to("/catways").into_response()),
        Err(e) => {
            let form = CatwayForm {
                catway_state: form.catway_state,
                ..CatwayForm::from(&existing)
            };
            form_error(e, |msg| {
                views::catway_form(&session.user, &form, Some(catway_number), Some(msg))
            })
        }
    }
}

async fn delete_catway(
    State(state): State<Arc<AppState>>,
    Path(number): Path<String>,
) -> PageResult<Redirect> {
    state.catways.delete(parse_catway_number(&number)?).await?;
    Ok(Redirect::to("/catways"))
}

// ─── Reservations ────────────────────────────────────────────

fn reservation_input(form: &ReservationForm) -> Result<ReservationInput> {
    Ok(ReservationInput {
        catway_number: optional_number(&form.catway_number)?,
        client_name: non_empty(&form.client_name),
        boat_name: non_empty(&form.boat_name),
        start_date: non_empty(&form.start_date),
        end_date: non_empty(&form.end_date),
    })
}

async fn reservation_list(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> PageResult<Html<String>> {
    let reservations = state.reservations.list().await?;
    Ok(Html(views::reservation_list(&session.user, &reservations)))
}

async fn new_reservation(Extension(session): Extension<Session>) -> Html<String> {
    Html(views::reservation_form(
        &session.user,
        &ReservationForm::default(),
        None,
        None,
    ))
}

async fn create_reservation(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Form(form): Form<ReservationForm>,
) -> PageResult<Response> {
    let result = match reservation_input(&form) {
        Ok(input) => match input.catway_number {
            Some(catway_number) => state.reservations.create(catway_number, input).await,
            None => Err(AppError::Validation("catwayNumber is required".to_string())),
        },
        Err(e) => Err(e),
    };
    match result {
        Ok(_) => Ok(Redirect::to("/reservations").into_response()),
        Err(e) => form_error(e, |msg| {
            views::reservation_form(&session.user, &form, None, Some(msg))
        }),
    }
}

async fn edit_reservation(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
) -> PageResult<Html<String>> {
    let reservation = state.reservations.get(&id).await?;
    Ok(Html(views::reservation_form(
        &session.user,
        &ReservationForm::from(&reservation),
        Some(&reservation.id),
        None,
    )))
}

async fn update_reservation(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
    Form(form): Form<ReservationForm>,
) -> PageResult<Response> {
    let result = match reservation_input(&form) {
        Ok(input) => state.reservations.update(&id, input).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(_) => Ok(Redirect::to("/reservations").into_response()),
        Err(e) => form_error(e, |msg| {
            views::reservation_form(&session.user, &form, Some(&id), Some(msg))
        }),
    }
}

async fn delete_reservation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> PageResult<Redirect> {
    state.reservations.delete(&id).await?;
    Ok(Redirect::to("/reservations"))
}

// ─── Users ───────────────────────────────────────────────────

async fn user_list(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> PageResult<Html<String>> {
    let users = state.users.list_users().await?;
    Ok(Html(views::user_list(&session.user, &users)))
}

async fn new_user(Extension(session): Extension<Session>) -> Html<String> {
    Html(views::user_form(
        &session.user,
        &UserForm::default(),
        None,
        None,
    ))
}

async fn create_user(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Form(form): Form<UserForm>,
) -> PageResult<Response> {
    let input = NewUserInput {
        username: non_empty(&form.username),
        email: non_empty(&form.email),
        password: (!form.password.is_empty()).then(|| form.password.clone()),
    };
    match state.users.create_user(input).await {
        Ok(_) => Ok(Redirect::to("/users").into_response()),
        Err(e) => {
            let form = UserForm {
                password: String::new(),
                ..form
            };
            form_error(e, |msg| {
                views::user_form(&session.user, &form, None, Some(msg))
            })
        }
    }
}

async fn edit_user(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(email): Path<String>,
) -> PageResult<Html<String>> {
    let user = state.users.get_user(&email).await?;
    Ok(Html(views::user_form(
        &session.user,
        &UserForm::from(&user),
        Some(&user.email),
        None,
    )))
}

async fn update_user(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(email): Path<String>,
    Form(form): Form<UserForm>,
) -> PageResult<Response> {
    let input = UserUpdateInput {
        username: Some(form.username.clone()),
        email: Some(form.email.clone()),
    };
    match state.users.update_user(&email, input).await {
        Ok(_) => Ok(Redirect::to("/users").into_response()),
        Err(e) => form_error(e, |msg| {
            views::user_form(&session.user, &form, Some(&email), Some(msg))
        }),
    }
}

async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> PageResult<Redirect> {
    state.users.delete_user(&email).await?;
    Ok(Redirect::to("/users"))
}
