// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Port office: back office for a marina's catways and reservations
//!
//! This crate provides the JSON API (bearer-token auth) and the server-rendered
//! staff pages (cookie sessions) over a shared document store.

pub mod config;
pub mod db;
pub mod error;
pub mod import;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;
pub mod views;

use config::Config;
use db::FirestoreDb;
use middleware::SessionStore;
use services::{CatwayService, ReservationService, UserService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub users: UserService,
    pub catways: CatwayService,
    pub reservations: ReservationService,
    pub sessions: SessionStore,
}

impl AppState {
    /// Wire the services to `db`.
    pub fn new(config: Config, db: FirestoreDb) -> Self {
        let sessions = SessionStore::new(&config.session_secret, config.is_production());
        Self {
            users: UserService::new(db.clone(), &config.jwt_signing_key),
            catways: CatwayService::new(db.clone()),
            reservations: ReservationService::new(db.clone()),
            sessions,
            db,
            config,
        }
    }
}
