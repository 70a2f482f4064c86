// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer (Firestore, with an in-process fallback).

pub mod firestore;
pub mod memory;

pub use self::firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const CATWAYS: &str = "catways";
    pub const RESERVATIONS: &str = "reservations";
}
