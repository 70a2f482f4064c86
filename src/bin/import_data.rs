// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Replace all catways and reservations with the contents of two JSON files.
//!
//! Usage: `import_data [catways.json] [reservations.json]`
//!
//! Uses `STORE_URL` like the server. Exits non-zero on any failure.

use port_office::config::StoreLocation;
use port_office::db::FirestoreDb;
use port_office::import::{read_records, replace_all};
use port_office::models::{CatwayInput, ReservationInput};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("port_office=info,import_data=info,warn")),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    dotenvy::dotenv().ok();

    let mut args = std::env::args().skip(1);
    let catways_path = PathBuf::from(args.next().unwrap_or_else(|| "catways.json".to_string()));
    let reservations_path =
        PathBuf::from(args.next().unwrap_or_else(|| "reservations.json".to_string()));

    let store: StoreLocation = std::env::var("STORE_URL")
        .unwrap_or_else(|_| "memory://".to_string())
        .parse()?;
    if store == StoreLocation::Memory {
        tracing::warn!("STORE_URL is memory://; imported data will not outlive this process");
    }

    let catways: Vec<CatwayInput> = read_records(&catways_path)?;
    let reservations: Vec<ReservationInput> = read_records(&reservations_path)?;
    tracing::info!(
        catways = catways.len(),
        reservations = reservations.len(),
        "Records loaded"
    );

    let db = FirestoreDb::open(&store).await?;
    let summary = replace_all(&db, catways, reservations).await?;
    db.close();

    tracing::info!(
        catways = summary.catways_imported,
        reservations = summary.reservations_imported,
        "Import finished"
    );
    Ok(())
}
