// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Catway registry.

use crate::db::FirestoreDb;
use crate::error::{AppError, Result};
use crate::models::{Catway, CatwayInput, CatwayUpdate};
use crate::time_utils::now_utc;

#[derive(Clone)]
pub struct CatwayService {
    db: FirestoreDb,
}

fn catway_not_found(catway_number: i64) -> AppError {
    AppError::NotFound(format!("Catway {} not found", catway_number))
}

impl CatwayService {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// All catways ordered by number.
    pub async fn list(&self) -> Result<Vec<Catway>> {
        self.db.list_catways().await
    }

    pub async fn get(&self, catway_number: i64) -> Result<Catway> {
        self.db
            .get_catway(catway_number)
            .await?
            .ok_or_else(|| catway_not_found(catway_number))
    }

    /// Register a new catway. The number must not already be in use.
    pub async fn create(&self, input: CatwayInput) -> Result<Catway> {
        let catway = Catway::create(input, now_utc())?;
        self.db.insert_catway(&catway).await.map_err(|e| match e {
            AppError::Conflict(_) => AppError::Conflict(format!(
                "Catway {} already exists",
                catway.catway_number
            )),
            other => other,
        })?;

        tracing::info!(
            catway_number = catway.catway_number,
            catway_type = %catway.catway_type,
            "Catway created"
        );
        Ok(catway)
    }

    /// Change the state description. Number and type stay fixed.
    pub async fn update(&self, catway_number: i64, input: CatwayUpdate) -> Result<Catway> {
        let existing = self.get(catway_number).await?;
        let updated = existing.apply_update(&input)?;
        if updated != existing {
            self.db.put_catway(&updated).await?;
            tracing::info!(catway_number, "Catway updated");
        }
        Ok(updated)
    }

    /// Remove a catway. Reservations that name it are left untouched.
    pub async fn delete(&self, catway_number: i64) -> Result<()> {
        if !self.db.delete_catway(catway_number).await? {
            return Err(catway_not_found(catway_number));
        }
        tracing::info!(catway_number, "Catway deleted");
        Ok(())
    }
}
