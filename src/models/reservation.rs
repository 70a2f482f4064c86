// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Reservation model.
//!
//! A reservation refers to its catway by number only. Nothing checks that the
//! catway exists, and deleting a catway leaves its reservations in place.

use crate::error::AppError;
use crate::time_utils::{parse_timestamp, utc_seconds};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Reservation document stored in the `reservations` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_date_range"))]
pub struct Reservation {
    pub id: String,
    #[validate(range(min = 1, message = "catwayNumber must be at least 1"))]
    pub catway_number: i64,
    #[validate(length(
        min = 2,
        max = 100,
        message = "clientName must be between 2 and 100 characters"
    ))]
    pub client_name: String,
    #[validate(length(
        min = 2,
        max = 100,
        message = "boatName must be between 2 and 100 characters"
    ))]
    pub boat_name: String,
    #[serde(with = "utc_seconds")]
    pub start_date: DateTime<Utc>,
    #[serde(with = "utc_seconds")]
    pub end_date: DateTime<Utc>,
    #[serde(with = "utc_seconds")]
    pub created_at: DateTime<Utc>,
}

fn validate_date_range(reservation: &Reservation) -> Result<(), ValidationError> {
    if reservation.end_date <= reservation.start_date {
        let mut error = ValidationError::new("date_range");
        error.message = Some("endDate must be after startDate".into());
        return Err(error);
    }
    Ok(())
}

/// Incoming reservation payload (create or partial update).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationInput {
    pub catway_number: Option<i64>,
    pub client_name: Option<String>,
    pub boat_name: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

fn parse_date_field(name: &str, raw: &str) -> Result<DateTime<Utc>, AppError> {
    parse_timestamp(raw).ok_or_else(|| AppError::Validation(format!("{} is not a valid date", name)))
}

fn required<'a>(name: &str, value: &'a Option<String>) -> Result<&'a str, AppError> {
    value
        .as_deref()
        .ok_or_else(|| AppError::Validation(format!("{} is required", name)))
}

impl Reservation {
    /// Build and validate a new reservation for `catway_number`. The path
    /// number wins over any number in the payload.
    pub fn create(
        id: String,
        catway_number: i64,
        input: &ReservationInput,
        now: DateTime<Utc>,
    ) -> Result<Self, AppError> {
        let client_name = required("clientName", &input.client_name)?;
        let boat_name = required("boatName", &input.boat_name)?;
        let start_date = parse_date_field("startDate", required("startDate", &input.start_date)?)?;
        let end_date = parse_date_field("endDate", required("endDate", &input.end_date)?)?;

        let reservation = Reservation {
            id,
            catway_number,
            client_name: client_name.trim().to_string(),
            boat_name: boat_name.trim().to_string(),
            start_date,
            end_date,
            created_at: now,
        };
        reservation.validate()?;
        Ok(reservation)
    }

    /// Merge a partial update into this reservation and validate the result
    /// as a whole, so the date ordering is checked against the merged record.
    pub fn apply_update(&self, input: &ReservationInput) -> Result<Self, AppError> {
        let mut updated = self.clone();
        if let Some(number) = input.catway_number {
            updated.catway_number = number;
        }
        if let Some(name) = &input.client_name {
            updated.client_name = name.trim().to_string();
        }
        if let Some(name) = &input.boat_name {
            updated.boat_name = name.trim().to_string();
        }
        if let Some(raw) = &input.start_date {
            updated.start_date = parse_date_field("startDate", raw)?;
        }
        if let Some(raw) = &input.end_date {
            updated.end_date = parse_date_field("endDate", raw)?;
        }
        updated.validate()?;
        Ok(updated)
    }

    /// Whether `now` falls inside the reserved range (inclusive on both ends).
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.start_date <= now && now <= self.end_date
    }
}
