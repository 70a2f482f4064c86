// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Middleware modules (bearer auth, page sessions, security headers).

pub mod auth;
pub mod security;
pub mod session;

pub use auth::require_auth;
pub use session::{require_session, SessionStore};
