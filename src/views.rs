// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Server-rendered HTML for the staff pages.
//!
//! Every interpolated value goes through [`escape`]; emails placed in URLs go
//! through `urlencoding` first.

use crate::models::{Catway, CatwayType, Reservation, UserSummary};
use crate::time_utils::format_datetime_local;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt::Write as _;

const STYLE: &str = "body{font-family:sans-serif;margin:0;color:#1d2a38}\
header{background:#1d3557;color:#fff;padding:.6rem 1rem;display:flex;gap:1rem;align-items:center}\
header a{color:#fff}main{padding:1rem;max-width:60rem}\
table{border-collapse:collapse;width:100%}td,th{border-bottom:1px solid #ccd;padding:.35rem;text-align:left}\
form.inline{display:inline}label{display:block;margin:.5rem 0}\
.error{background:#fde2e1;border:1px solid #e63946;padding:.5rem}\
.stats{display:flex;gap:1rem}.stats div{border:1px solid #ccd;padding:.75rem;min-width:8rem}";

/// Login form fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Catway form fields as submitted by the browser.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CatwayForm {
    pub catway_number: String,
    pub catway_type: String,
    pub catway_state: String,
}

impl From<&Catway> for CatwayForm {
    fn from(catway: &Catway) -> Self {
        Self {
            catway_number: catway.catway_number.to_string(),
            catway_type: catway.catway_type.to_string(),
            catway_state: catway.catway_state.clone(),
        }
    }
}

/// Reservation form fields as submitted by the browser.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReservationForm {
    pub catway_number: String,
    pub client_name: String,
    pub boat_name: String,
    pub start_date: String,
    pub end_date: String,
}

impl From<&Reservation> for ReservationForm {
    fn from(r: &Reservation) -> Self {
        Self {
            catway_number: r.catway_number.to_string(),
            client_name: r.client_name.clone(),
            boat_name: r.boat_name.clone(),
            start_date: format_datetime_local(r.start_date),
            end_date: format_datetime_local(r.end_date),
        }
    }
}

/// User form fields. The password is only read on creation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl From<&UserSummary> for UserForm {
    fn from(user: &UserSummary) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
            password: String::new(),
        }
    }
}

/// Escape text for HTML element content and quoted attribute values.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn display_date(date: DateTime<Utc>) -> String {
    date.format("%Y-%m-%d %H:%M UTC").to_string()
}

fn error_banner(error: Option<&str>) -> String {
    error
        .map(|msg| format!(r#"<p class="error">{}</p>"#, escape(msg)))
        .unwrap_or_default()
}

fn user_path(email: &str) -> String {
    format!("/users/{}", urlencoding::encode(email))
}

fn layout(title: &str, user: Option<&UserSummary>, body: &str) -> String {
    let nav = match user {
        Some(user) => format!(
            r#"<a href="/dashboard">Dashboard</a><a href="/catways">Catways</a><a href="/reservations">Reservations</a><a href="/users">Users</a><span>{}</span><a href="/logout">Log out</a>"#,
            escape(&user.username)
        ),
        None => String::new(),
    };
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>{title} - Port Office</title><style>{STYLE}</style></head>
<body>
<header><strong>Port Office</strong>{nav}</header>
<main>
<h1>{title}</h1>
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
    )
}

pub fn login_page(form: &LoginForm, error: Option<&str>) -> String {
    let body = format!(
        r#"{}<form method="post" action="/login">
<label>Email <input type="email" name="email" value="{}" required></label>
<label>Password <input type="password" name="password" required></label>
<button type="submit">Log in</button>
</form>"#,
        error_banner(error),
        escape(&form.email)
    );
    layout("Log in", None, &body)
}

/// Page for a failed request that has no form to go back to.
pub fn error_page(user: Option<&UserSummary>, status: u16, message: &str) -> String {
    let body = format!(
        r#"<p class="error">{} ({})</p><p><a href="/dashboard">Back to dashboard</a></p>"#,
        escape(message),
        status
    );
    layout("Error", user, &body)
}

fn reservation_rows(reservations: &[Reservation], with_actions: bool) -> String {
    let mut rows = String::new();
    for r in reservations {
        let actions = if with_actions {
            let id = escape(&r.id);
            format!(
                r#"<td><a href="/reservations/{id}/edit">Edit</a> <form class="inline" method="post" action="/reservations/{id}/delete"><button type="submit">Delete</button></form></td>"#
            )
        } else {
            String::new()
        };
        let _ = write!(
            rows,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>{}</tr>",
            r.catway_number,
            escape(&r.client_name),
            escape(&r.boat_name),
            display_date(r.start_date),
            display_date(r.end_date),
            actions
        );
    }
    rows
}

pub fn dashboard(
    user: &UserSummary,
    catway_count: usize,
    user_count: usize,
    active: &[Reservation],
) -> String {
    let list = if active.is_empty() {
        "<p>No reservations in progress.</p>".to_string()
    } else {
        format!(
            "<table><tr><th>Catway</th><th>Client</th><th>Boat</th><th>Start</th><th>End</th></tr>{}</table>",
            reservation_rows(active, false)
        )
    };
    let body = format!(
        r#"<p>Welcome, {}.</p>
<div class="stats"><div><strong>{}</strong><br>catways</div><div><strong>{}</strong><br>users</div><div><strong>{}</strong><br>active reservations</div></div>
<h2>In progress</h2>
{}"#,
        escape(&user.username),
        catway_count,
        user_count,
        active.len(),
        list
    );
    layout("Dashboard", Some(user), &body)
}

pub fn catway_list(user: &UserSummary, catways: &[Catway]) -> String {
    let mut rows = String::new();
    for c in catways {
        let n = c.catway_number;
        let _ = write!(
            rows,
            r#"<tr><td>{n}</td><td>{}</td><td>{}</td><td><a href="/catways/{n}/edit">Edit</a> <form class="inline" method="post" action="/catways/{n}/delete"><button type="submit">Delete</button></form></td></tr>"#,
            c.catway_type,
            escape(&c.catway_state),
        );
    }
    let body = format!(
        r#"<p><a href="/catways/new">New catway</a></p>
<table><tr><th>Number</th><th>Type</th><th>State</th><th></th></tr>{}</table>"#,
        rows
    );
    layout("Catways", Some(user), &body)
}

fn type_option(kind: CatwayType, selected: &str) -> String {
    let sel = if kind.as_str() == selected.trim().to_lowercase() {
        " selected"
    } else {
        ""
    };
    format!(r#"<option value="{0}"{1}>{0}</option>"#, kind.as_str(), sel)
}

/// Create form when `editing` is `None`, otherwise the state-only edit form.
pub fn catway_form(
    user: &UserSummary,
    form: &CatwayForm,
    editing: Option<i64>,
    error: Option<&str>,
) -> String {
    let (title, action, fixed_fields) = match editing {
        Some(n) => (
            format!("Catway {}", n),
            format!("/catways/{}/edit", n),
            format!(
                "<p>Number {} &middot; {}</p>",
                n,
                escape(&form.catway_type)
            ),
        ),
        None => (
            "New catway".to_string(),
            "/catways/new".to_string(),
            format!(
                r#"<label>Number <input type="number" name="catwayNumber" min="1" value="{}" required></label>
<label>Type <select name="catwayType">{}{}</select></label>"#,
                escape(&form.catway_number),
                type_option(CatwayType::Long, &form.catway_type),
                type_option(CatwayType::Short, &form.catway_type),
            ),
        ),
    };
    let body = format!(
        r#"{}<form method="post" action="{}">
{}
<label>State <input type="text" name="catwayState" value="{}"></label>
<button type="submit">Save</button> <a href="/catways">Cancel</a>
</form>"#,
        error_banner(error),
        action,
        fixed_fields,
        escape(&form.catway_state)
    );
    layout(&title, Some(user), &body)
}

pub fn reservation_list(user: &UserSummary, reservations: &[Reservation]) -> String {
    let body = format!(
        r#"<p><a href="/reservations/new">New reservation</a></p>
<table><tr><th>Catway</th><th>Client</th><th>Boat</th><th>Start</th><th>End</th><th></th></tr>{}</table>"#,
        reservation_rows(reservations, true)
    );
    layout("Reservations", Some(user), &body)
}

pub fn reservation_form(
    user: &UserSummary,
    form: &ReservationForm,
    editing: Option<&str>,
    error: Option<&str>,
) -> String {
    let (title, action) = match editing {
        Some(id) => (
            "Edit reservation".to_string(),
            format!("/reservations/{}/edit", escape(id)),
        ),
        None => ("New reservation".to_string(), "/reservations/new".to_string()),
    };
    let body = format!(
        r#"{}<form method="post" action="{}">
<label>Catway <input type="number" name="catwayNumber" min="1" value="{}" required></label>
<label>Client <input type="text" name="clientName" value="{}" required></label>
<label>Boat <input type="text" name="boatName" value="{}" required></label>
<label>Start (UTC) <input type="datetime-local" name="startDate" value="{}" required></label>
<label>End (UTC) <input type="datetime-local" name="endDate" value="{}" required></label>
<button type="submit">Save</button> <a href="/reservations">Cancel</a>
</form>"#,
        error_banner(error),
        action,
        escape(&form.catway_number),
        escape(&form.client_name),
        escape(&form.boat_name),
        escape(&form.start_date),
        escape(&form.end_date),
    );
    layout(&title, Some(user), &body)
}

pub fn user_list(user: &UserSummary, users: &[UserSummary]) -> String {
    let mut rows = String::new();
    for u in users {
        let path = escape(&user_path(&u.email));
        let _ = write!(
            rows,
            r#"<tr><td>{}</td><td>{}</td><td>{}</td><td><a href="{path}/edit">Edit</a> <form class="inline" method="post" action="{path}/delete"><button type="submit">Delete</button></form></td></tr>"#,
            escape(&u.username),
            escape(&u.email),
            display_date(u.created_at),
        );
    }
    let body = format!(
        r#"<p><a href="/users/new">New user</a></p>
<table><tr><th>Username</th><th>Email</th><th>Created</th><th></th></tr>{}</table>"#,
        rows
    );
    layout("Users", Some(user), &body)
}

/// Create form (with password) when `editing` is `None`, otherwise the
/// profile edit form for the user with that email.
pub fn user_form(
    user: &UserSummary,
    form: &UserForm,
    editing: Option<&str>,
    error: Option<&str>,
) -> String {
    let (title, action, password) = match editing {
        Some(email) => (
            "Edit user".to_string(),
            escape(&format!("{}/edit", user_path(email))),
            "",
        ),
        None => (
            "New user".to_string(),
            "/users/new".to_string(),
            r#"<label>Password <input type="password" name="password" minlength="6" required></label>"#,
        ),
    };
    let body = format!(
        r#"{}<form method="post" action="{}">
<label>Username <input type="text" name="username" value="{}" required></label>
<label>Email <input type="email" name="email" value="{}" required></label>
{}
<button type="submit">Save</button> <a href="/users">Cancel</a>
</form>"#,
        error_banner(error),
        action,
        escape(&form.username),
        escape(&form.email),
        password
    );
    layout(&title, Some(user), &body)
}
