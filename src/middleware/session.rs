// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Server-side sessions for the HTML pages.
//!
//! The browser holds only `<session id>.<hex HMAC-SHA256(session id)>` in the
//! `port_session` cookie; the user summary and token stay on the server.
//! A session lives until logout or until it is 24 hours old, matching the
//! cookie max age. Expired records are dropped on lookup and whenever a new
//! session is opened. The bearer token's own expiry is not re-checked.

use crate::models::UserSummary;
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use hmac::{Hmac, Mac};
use ring::rand::{SecureRandom, SystemRandom};
use sha2::Sha256;
use std::sync::Arc;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Session cookie name.
pub const SESSION_COOKIE: &str = "port_session";

const SESSION_ID_BYTES: usize = 32;
const SESSION_LIFETIME_HOURS: i64 = 24;

/// A logged-in page session.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: UserSummary,
    pub token: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// In-process session map shared by all requests.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<DashMap<String, Session>>,
    secret: Vec<u8>,
    secure_cookies: bool,
    rng: SystemRandom,
}

impl SessionStore {
    pub fn new(secret: &[u8], secure_cookies: bool) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            secret: secret.to_vec(),
            secure_cookies,
            rng: SystemRandom::new(),
        }
    }

    fn sign(&self, session_id: &str) -> anyhow::Result<String> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| anyhow::anyhow!("HMAC init failed: {}", e))?;
        mac.update(session_id.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Return the session ID if the cookie value carries a valid signature.
    fn verify<'a>(&self, cookie_value: &'a str) -> Option<&'a str> {
        let (session_id, signature) = cookie_value.rsplit_once('.')?;
        let expected = self.sign(session_id).ok()?;
        if expected.as_bytes().ct_eq(signature.as_bytes()).into() {
            Some(session_id)
        } else {
            tracing::warn!("Session cookie signature mismatch");
            None
        }
    }

    /// Open a session and return the cookie that references it.
    pub fn create(&self, user: UserSummary, token: String) -> anyhow::Result<Cookie<'static>> {
        self.create_at(user, token, Utc::now())
    }

    fn create_at(
        &self,
        user: UserSummary,
        token: String,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Cookie<'static>> {
        self.prune_expired(now);

        let mut bytes = [0u8; SESSION_ID_BYTES];
        self.rng
            .fill(&mut bytes)
            .map_err(|_| anyhow::anyhow!("Failed to generate session id"))?;
        let session_id = URL_SAFE_NO_PAD.encode(bytes);
        let value = format!("{}.{}", session_id, self.sign(&session_id)?);

        tracing::info!(email = %user.email, "Session opened");
        self.sessions.insert(
            session_id,
            Session {
                user,
                token,
                created_at: now,
                expires_at: now + chrono::Duration::hours(SESSION_LIFETIME_HOURS),
            },
        );

        Ok(Cookie::build((SESSION_COOKIE, value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure_cookies)
            .max_age(time::Duration::hours(SESSION_LIFETIME_HOURS))
            .build())
    }

    /// Session referenced by the request cookies, if any.
    pub fn lookup(&self, jar: &CookieJar) -> Option<Session> {
        self.lookup_at(jar, Utc::now())
    }

    fn lookup_at(&self, jar: &CookieJar, now: DateTime<Utc>) -> Option<Session> {
        let cookie = jar.get(SESSION_COOKIE)?;
        let session_id = self.verify(cookie.value())?;
        let session = self.sessions.get(session_id).map(|s| s.value().clone())?;
        if session.is_expired(now) {
            self.sessions.remove_if(session_id, |_, s| s.is_expired(now));
            tracing::info!(email = %session.user.email, "Session expired");
            return None;
        }
        Some(session)
    }

    /// Drop every session that has outlived its lifetime.
    fn prune_expired(&self, now: DateTime<Utc>) {
        let mut pruned = 0usize;
        self.sessions.retain(|_, session| {
            let live = !session.is_expired(now);
            if !live {
                pruned += 1;
            }
            live
        });
        if pruned > 0 {
            tracing::debug!(pruned, "Expired sessions dropped");
        }
    }

    /// Drop the session referenced by the cookies and return a jar that
    /// clears the cookie in the browser.
    pub fn destroy(&self, jar: CookieJar) -> CookieJar {
        if let Some(cookie) = jar.get(SESSION_COOKIE) {
            if let Some(session_id) = self.verify(cookie.value()) {
                if let Some((_, session)) = self.sessions.remove(session_id) {
                    tracing::info!(email = %session.user.email, "Session closed");
                }
            }
        }
        jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
    }

    /// Number of open sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Middleware for page routes: redirect to the login page unless the
/// request carries a live session. The session is attached as an extension.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    match state.sessions.lookup(&jar) {
        Some(session) => {
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        None => Redirect::to("/").into_response(),
    }
}
