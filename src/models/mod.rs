// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod catway;
pub mod reservation;
pub mod user;

pub use catway::{Catway, CatwayInput, CatwayType, CatwayUpdate};
pub use reservation::{Reservation, ReservationInput};
pub use user::{NewUser, NewUserInput, User, UserSummary, UserUpdateInput};
