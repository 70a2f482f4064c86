// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod catways;
pub mod reservations;
pub mod users;

pub use catways::CatwayService;
pub use reservations::ReservationService;
pub use users::{AuthResult, UserService};
