// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Reservation book.
//!
//! Reservations are addressed by their own ID. The catway number is a plain
//! attribute: it is not checked against the catway registry and overlapping
//! bookings on the same catway are accepted.

use crate::db::FirestoreDb;
use crate::error::{AppError, Result};
use crate::models::{Reservation, ReservationInput};
use crate::time_utils::now_utc;
use chrono::{DateTime, Utc};

#[derive(Clone)]
pub struct ReservationService {
    db: FirestoreDb,
}

fn reservation_not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Reservation {} not found", id))
}

/// IDs are store document keys; anything with a path separator cannot exist.
fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && !id.contains('/')
}

impl ReservationService {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Every reservation, ordered by start date.
    pub async fn list(&self) -> Result<Vec<Reservation>> {
        self.db.list_reservations().await
    }

    /// Reservations naming `catway_number`, whether or not that catway exists.
    pub async fn list_for_catway(&self, catway_number: i64) -> Result<Vec<Reservation>> {
        self.db.list_reservations_for_catway(catway_number).await
    }

    pub async fn get(&self, id: &str) -> Result<Reservation> {
        if !is_valid_id(id) {
            return Err(reservation_not_found(id));
        }
        self.db
            .get_reservation(id)
            .await?
            .ok_or_else(|| reservation_not_found(id))
    }

    /// Book `catway_number`. The end date must fall after the start date.
    pub async fn create(&self, catway_number: i64, input: ReservationInput) -> Result<Reservation> {
        let id = uuid::Uuid::new_v4().to_string();
        let reservation = Reservation::create(id, catway_number, &input, now_utc())?;
        self.db.insert_reservation(&reservation).await?;

        tracing::info!(
            reservation_id = %reservation.id,
            catway_number,
            start = %reservation.start_date,
            end = %reservation.end_date,
            "Reservation created"
        );
        Ok(reservation)
    }

    /// Partial update. The merged record is validated as a whole.
    pub async fn update(&self, id: &str, input: ReservationInput) -> Result<Reservation> {
        let existing = self.get(id).await?;
        let updated = existing.apply_update(&input)?;
        if updated != existing {
            self.db.put_reservation(&updated).await?;
            tracing::info!(reservation_id = %id, "Reservation updated");
        }
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        if !is_valid_id(id) || !self.db.delete_reservation(id).await? {
            return Err(reservation_not_found(id));
        }
        tracing::info!(reservation_id = %id, "Reservation deleted");
        Ok(())
    }

    /// Reservations whose range contains `now`, ordered by start date.
    pub async fn active_at(&self, now: DateTime<Utc>) -> Result<Vec<Reservation>> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .filter(|r| r.is_active_at(now))
            .collect())
    }
}
