// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Catway (mooring berth) model and its field rules.

use crate::error::AppError;
use crate::time_utils::utc_seconds;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// State given to a catway created without one.
pub const DEFAULT_CATWAY_STATE: &str = "good condition";

/// Berth length class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatwayType {
    Long,
    Short,
}

impl CatwayType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CatwayType::Long => "long",
            CatwayType::Short => "short",
        }
    }
}

impl fmt::Display for CatwayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CatwayType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "long" => Ok(CatwayType::Long),
            "short" => Ok(CatwayType::Short),
            _ => Err(AppError::Validation(
                "catwayType must be \"long\" or \"short\"".to_string(),
            )),
        }
    }
}

/// Catway document stored in the `catways` collection (document ID = number).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Catway {
    #[validate(range(min = 1, message = "catwayNumber must be at least 1"))]
    pub catway_number: i64,
    pub catway_type: CatwayType,
    #[validate(length(
        min = 3,
        max = 200,
        message = "catwayState must be between 3 and 200 characters"
    ))]
    pub catway_state: String,
    #[serde(with = "utc_seconds")]
    pub created_at: DateTime<Utc>,
}

/// Incoming catway payload. Every field is optional so that missing fields
/// surface as validation errors rather than deserialization failures.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatwayInput {
    pub catway_number: Option<i64>,
    pub catway_type: Option<String>,
    pub catway_state: Option<String>,
}

/// Update payload. Only the state is read; any other field in the body is
/// ignored whatever its type.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatwayUpdate {
    pub catway_state: Option<String>,
}

impl Catway {
    /// Build and validate a new catway from a create payload.
    pub fn create(input: CatwayInput, now: DateTime<Utc>) -> Result<Self, AppError> {
        let catway_number = input
            .catway_number
            .ok_or_else(|| AppError::Validation("catwayNumber is required".to_string()))?;
        let catway_type: CatwayType = input
            .catway_type
            .as_deref()
            .ok_or_else(|| AppError::Validation("catwayType is required".to_string()))?
            .parse()?;
        let catway_state = input
            .catway_state
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| DEFAULT_CATWAY_STATE.to_string());

        let catway = Catway {
            catway_number,
            catway_type,
            catway_state,
            created_at: now,
        };
        catway.validate()?;
        Ok(catway)
    }

    /// Apply an update payload. Number and type are immutable.
    pub fn apply_update(&self, input: &CatwayUpdate) -> Result<Self, AppError> {
        let mut updated = self.clone();
        if let Some(state) = &input.catway_state {
            updated.catway_state = state.trim().to_string();
        }
        updated.validate()?;
        Ok(updated)
    }

    /// Document ID in the store.
    pub fn document_id(&self) -> String {
        self.catway_number.to_string()
    }
}
