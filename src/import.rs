// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bulk replacement of the catway and reservation collections.
//!
//! Every record is validated before anything is deleted, so a bad file leaves
//! the store untouched.

use crate::db::FirestoreDb;
use crate::error::{AppError, Result};
use crate::models::{Catway, CatwayInput, Reservation, ReservationInput};
use crate::time_utils::now_utc;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::path::Path;

/// Counts reported after an import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub catways_removed: usize,
    pub reservations_removed: usize,
    pub catways_imported: usize,
    pub reservations_imported: usize,
}

/// Read a JSON array of records from `path`.
pub fn read_records<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
    serde_json::from_str(&raw)
        .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))
}

fn build_catways(records: Vec<CatwayInput>) -> Result<Vec<Catway>> {
    let now = now_utc();
    let mut seen = HashSet::new();
    let mut catways = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        let catway = Catway::create(record, now)
            .map_err(|e| AppError::Validation(format!("catway #{}: {}", index + 1, e)))?;
        if !seen.insert(catway.catway_number) {
            return Err(AppError::Conflict(format!(
                "catway #{}: number {} appears more than once",
                index + 1,
                catway.catway_number
            )));
        }
        catways.push(catway);
    }
    Ok(catways)
}

fn build_reservations(records: Vec<ReservationInput>) -> Result<Vec<Reservation>> {
    let now = now_utc();
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            let catway_number = record.catway_number.ok_or_else(|| {
                AppError::Validation(format!(
                    "reservation #{}: catwayNumber is required",
                    index + 1
                ))
            })?;
            Reservation::create(
                uuid::Uuid::new_v4().to_string(),
                catway_number,
                &record,
                now,
            )
            .map_err(|e| AppError::Validation(format!("reservation #{}: {}", index + 1, e)))
        })
        .collect()
}

/// Replace both collections with the given records.
pub async fn replace_all(
    db: &FirestoreDb,
    catway_records: Vec<CatwayInput>,
    reservation_records: Vec<ReservationInput>,
) -> Result<ImportSummary> {
    let catways = build_catways(catway_records)?;
    let reservations = build_reservations(reservation_records)?;

    let catways_removed = db.clear_catways().await?;
    let reservations_removed = db.clear_reservations().await?;
    tracing::info!(catways_removed, reservations_removed, "Existing data removed");

    db.batch_insert_catways(&catways).await?;
    tracing::info!(count = catways.len(), "Catways imported");

    db.batch_insert_reservations(&reservations).await?;
    tracing::info!(count = reservations.len(), "Reservations imported");

    Ok(ImportSummary {
        catways_removed,
        reservations_removed,
        catways_imported: catways.len(),
        reservations_imported: reservations.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catway(number: i64) -> CatwayInput {
        CatwayInput {
            catway_number: Some(number),
            catway_type: Some("short".to_string()),
            catway_state: None,
        }
    }

    fn reservation(number: Option<i64>) -> ReservationInput {
        ReservationInput {
            catway_number: number,
            client_name: Some("Alice".to_string()),
            boat_name: Some("Sea Breeze".to_string()),
            start_date: Some("2024-06-01T00:00:00Z".to_string()),
            end_date: Some("2024-06-10T00:00:00Z".to_string()),
        }
    }

    #[tokio::test]
    async fn test_replace_all_clears_previous_data() {
        let db = FirestoreDb::new_in_memory();
        replace_all(&db, vec![catway(1), catway(2)], vec![reservation(Some(1))])
            .await
            .unwrap();

        let summary = replace_all(&db, vec![catway(3)], vec![reservation(Some(3))])
            .await
            .unwrap();
        assert_eq!(
            summary,
            ImportSummary {
                catways_removed: 2,
                reservations_removed: 1,
                catways_imported: 1,
                reservations_imported: 1,
            }
        );
        let numbers: Vec<i64> = db
            .list_catways()
            .await
            .unwrap()
            .iter()
            .map(|c| c.catway_number)
            .collect();
        assert_eq!(numbers, vec![3]);
    }

    #[tokio::test]
    async fn test_invalid_file_leaves_store_untouched() {
        let db = FirestoreDb::new_in_memory();
        replace_all(&db, vec![catway(1)], vec![]).await.unwrap();

        let err = replace_all(&db, vec![catway(2)], vec![reservation(None)])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("reservation #1"));
        assert_eq!(db.list_catways().await.unwrap().len(), 1);
    }

    #[test]
    fn test_duplicate_numbers_rejected() {
        let err = build_catways(vec![catway(4), catway(4)]).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn test_read_records_reports_path() {
        let err = read_records::<CatwayInput>(Path::new("/nonexistent/catways.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/catways.json"));
    }
}
