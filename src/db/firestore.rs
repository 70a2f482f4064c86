// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Document store client with typed operations.
//!
//! Provides high-level operations for:
//! - Users (keyed by email)
//! - Catways (keyed by catway number)
//! - Reservations (keyed by generated ID)
//!
//! Backed by Firestore in production, by an in-process map for local
//! development and tests, or by nothing at all (offline handle whose every
//! call fails).

use crate::config::StoreLocation;
use crate::db::collections;
use crate::db::memory::MemoryStore;
use crate::error::AppError;
use crate::models::{Catway, Reservation, User};
use firestore::errors::FirestoreError;
use futures_util::{stream, StreamExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

const MAX_CONCURRENT_DB_OPS: usize = 50;
// Firestore limits batch/transaction writes to 500 operations.
// We use a safe limit of 400 to allow headroom.
const BATCH_SIZE: usize = 400;

#[derive(Clone)]
enum Backend {
    Firestore(firestore::FirestoreDb),
    Memory(Arc<MemoryStore>),
    Offline,
}

/// Document store handle. Cheap to clone; clones share the connection.
#[derive(Clone)]
pub struct FirestoreDb {
    backend: Backend,
}

/// Map a Firestore write error, keeping `ALREADY_EXISTS` distinct from
/// infrastructure failures.
fn map_write_error(e: FirestoreError) -> AppError {
    match e {
        conflict @ FirestoreError::DataConflictError(_) => AppError::Conflict(conflict.to_string()),
        other => AppError::Database(other.to_string()),
    }
}

fn offline() -> AppError {
    AppError::Database("Database not connected (offline mode)".to_string())
}

impl FirestoreDb {
    /// Connect to Firestore.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            backend: Backend::Firestore(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            backend: Backend::Firestore(client),
        })
    }

    /// Open the store named by `STORE_URL`.
    pub async fn open(location: &StoreLocation) -> Result<Self, AppError> {
        match location {
            StoreLocation::Firestore { project_id } => Self::new(project_id).await,
            StoreLocation::Memory => {
                tracing::warn!("Using in-memory document store; data is lost on restart");
                Ok(Self::new_in_memory())
            }
        }
    }

    /// Create an empty in-process store.
    pub fn new_in_memory() -> Self {
        Self {
            backend: Backend::Memory(Arc::new(MemoryStore::new())),
        }
    }

    /// Create an offline handle for testing.
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self {
            backend: Backend::Offline,
        }
    }

    /// Short backend name for logs.
    pub fn backend_name(&self) -> &'static str {
        match self.backend {
            Backend::Firestore(_) => "firestore",
            Backend::Memory(_) => "memory",
            Backend::Offline => "offline",
        }
    }

    /// Release the store at shutdown.
    pub fn close(self) {
        tracing::info!(backend = self.backend_name(), "Document store closed");
    }

    // ─── Generic Document Operations ─────────────────────────────

    async fn get_doc<T>(&self, collection: &str, id: &str) -> Result<Option<T>, AppError>
    where
        T: DeserializeOwned + Send,
    {
        match &self.backend {
            Backend::Firestore(client) => client
                .fluent()
                .select()
                .by_id_in(collection)
                .obj()
                .one(id)
                .await
                .map_err(|e| AppError::Database(e.to_string())),
            Backend::Memory(store) => store.get(collection, id),
            Backend::Offline => Err(offline()),
        }
    }

    /// Create-only write. Fails with `Conflict` if the document exists.
    async fn insert_doc<T>(&self, collection: &str, id: &str, doc: &T) -> Result<(), AppError>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
    {
        match &self.backend {
            Backend::Firestore(client) => {
                let _: T = client
                    .fluent()
                    .insert()
                    .into(collection)
                    .document_id(id)
                    .object(doc)
                    .execute()
                    .await
                    .map_err(map_write_error)?;
                Ok(())
            }
            Backend::Memory(store) => store.insert(collection, id, doc),
            Backend::Offline => Err(offline()),
        }
    }

    /// Overwrite a document.
    async fn put_doc<T>(&self, collection: &str, id: &str, doc: &T) -> Result<(), AppError>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
    {
        match &self.backend {
            Backend::Firestore(client) => {
                let _: () = client
                    .fluent()
                    .update()
                    .in_col(collection)
                    .document_id(id)
                    .object(doc)
                    .execute()
                    .await
                    .map_err(map_write_error)?;
                Ok(())
            }
            Backend::Memory(store) => store.put(collection, id, doc),
            Backend::Offline => Err(offline()),
        }
    }

    /// Delete a document; returns `false` if it did not exist.
    async fn delete_doc<T>(&self, collection: &str, id: &str) -> Result<bool, AppError>
    where
        T: DeserializeOwned + Send,
    {
        match &self.backend {
            Backend::Firestore(client) => {
                if self.get_doc::<T>(collection, id).await?.is_none() {
                    return Ok(false);
                }
                client
                    .fluent()
                    .delete()
                    .from(collection)
                    .document_id(id)
                    .execute()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                Ok(true)
            }
            Backend::Memory(store) => Ok(store.remove(collection, id)),
            Backend::Offline => Err(offline()),
        }
    }

    /// All documents of a collection, optionally filtered by an integer
    /// field, ascending by `order_by`.
    async fn query_docs<T>(
        &self,
        collection: &str,
        filter: Option<(&'static str, i64)>,
        order_by: &'static str,
    ) -> Result<Vec<T>, AppError>
    where
        T: DeserializeOwned + Send,
    {
        match &self.backend {
            Backend::Firestore(client) => {
                let query = client.fluent().select().from(collection);
                let query = match filter {
                    Some((field, value)) => query.filter(move |q| q.for_all([q.field(field).eq(value)])),
                    None => query,
                };
                query
                    .order_by([(order_by, firestore::FirestoreQueryDirection::Ascending)])
                    .obj()
                    .query()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))
            }
            Backend::Memory(store) => store.query(collection, filter, order_by),
            Backend::Offline => Err(offline()),
        }
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by email (exact match).
    pub async fn get_user(&self, email: &str) -> Result<Option<User>, AppError> {
        self.get_doc(collections::USERS, email).await
    }

    /// All users ordered by email.
    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.query_docs(collections::USERS, None, "email").await
    }

    /// Create a user. `Conflict` if the email is already registered.
    pub async fn insert_user(&self, user: &User) -> Result<(), AppError> {
        self.insert_doc(collections::USERS, &user.email, user).await
    }

    /// Overwrite an existing user document.
    pub async fn put_user(&self, user: &User) -> Result<(), AppError> {
        self.put_doc(collections::USERS, &user.email, user).await
    }

    pub async fn delete_user(&self, email: &str) -> Result<bool, AppError> {
        self.delete_doc::<User>(collections::USERS, email).await
    }

    // ─── Catway Operations ───────────────────────────────────────

    pub async fn get_catway(&self, catway_number: i64) -> Result<Option<Catway>, AppError> {
        self.get_doc(collections::CATWAYS, &catway_number.to_string())
            .await
    }

    /// All catways ordered by number.
    pub async fn list_catways(&self) -> Result<Vec<Catway>, AppError> {
        self.query_docs(collections::CATWAYS, None, "catwayNumber")
            .await
    }

    /// Create a catway. `Conflict` if the number is taken.
    pub async fn insert_catway(&self, catway: &Catway) -> Result<(), AppError> {
        self.insert_doc(collections::CATWAYS, &catway.document_id(), catway)
            .await
    }

    pub async fn put_catway(&self, catway: &Catway) -> Result<(), AppError> {
        self.put_doc(collections::CATWAYS, &catway.document_id(), catway)
            .await
    }

    pub async fn delete_catway(&self, catway_number: i64) -> Result<bool, AppError> {
        self.delete_doc::<Catway>(collections::CATWAYS, &catway_number.to_string())
            .await
    }

    // ─── Reservation Operations ──────────────────────────────────

    pub async fn get_reservation(&self, id: &str) -> Result<Option<Reservation>, AppError> {
        self.get_doc(collections::RESERVATIONS, id).await
    }

    /// All reservations ordered by start date.
    pub async fn list_reservations(&self) -> Result<Vec<Reservation>, AppError> {
        self.query_docs(collections::RESERVATIONS, None, "startDate")
            .await
    }

    /// Reservations referencing a catway number, ordered by start date.
    pub async fn list_reservations_for_catway(
        &self,
        catway_number: i64,
    ) -> Result<Vec<Reservation>, AppError> {
        self.query_docs(
            collections::RESERVATIONS,
            Some(("catwayNumber", catway_number)),
            "startDate",
        )
        .await
    }

    pub async fn insert_reservation(&self, reservation: &Reservation) -> Result<(), AppError> {
        self.insert_doc(collections::RESERVATIONS, &reservation.id, reservation)
            .await
    }

    pub async fn put_reservation(&self, reservation: &Reservation) -> Result<(), AppError> {
        self.put_doc(collections::RESERVATIONS, &reservation.id, reservation)
            .await
    }

    pub async fn delete_reservation(&self, id: &str) -> Result<bool, AppError> {
        self.delete_doc::<Reservation>(collections::RESERVATIONS, id)
            .await
    }

    // ─── Bulk Operations (data import) ───────────────────────────

    /// Insert many catways concurrently, with a limit to avoid overloading
    /// the store.
    pub async fn batch_insert_catways(&self, catways: &[Catway]) -> Result<(), AppError> {
        stream::iter(catways)
            .map(|catway| self.insert_catway(catway))
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .collect::<Vec<Result<(), AppError>>>()
            .await
            .into_iter()
            .collect::<Result<Vec<()>, AppError>>()?;
        Ok(())
    }

    /// Insert many reservations concurrently.
    pub async fn batch_insert_reservations(
        &self,
        reservations: &[Reservation],
    ) -> Result<(), AppError> {
        stream::iter(reservations)
            .map(|reservation| self.insert_reservation(reservation))
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .collect::<Vec<Result<(), AppError>>>()
            .await
            .into_iter()
            .collect::<Result<Vec<()>, AppError>>()?;
        Ok(())
    }

    /// Delete every catway. Returns the number of documents removed.
    pub async fn clear_catways(&self) -> Result<usize, AppError> {
        match &self.backend {
            Backend::Memory(store) => Ok(store.clear(collections::CATWAYS)),
            _ => {
                let catways = self.list_catways().await?;
                self.batch_delete(&catways, collections::CATWAYS, Catway::document_id)
                    .await?;
                Ok(catways.len())
            }
        }
    }

    /// Delete every reservation. Returns the number of documents removed.
    pub async fn clear_reservations(&self) -> Result<usize, AppError> {
        match &self.backend {
            Backend::Memory(store) => Ok(store.clear(collections::RESERVATIONS)),
            _ => {
                let reservations = self.list_reservations().await?;
                self.batch_delete(&reservations, collections::RESERVATIONS, |r: &Reservation| {
                    r.id.clone()
                })
                .await?;
                Ok(reservations.len())
            }
        }
    }

    /// Helper to batch delete Firestore documents using transactions.
    async fn batch_delete<T, F>(
        &self,
        items: &[T],
        collection: &str,
        id_extractor: F,
    ) -> Result<(), AppError>
    where
        F: Fn(&T) -> String,
    {
        let client = match &self.backend {
            Backend::Firestore(client) => client,
            _ => return Err(offline()),
        };

        for chunk in items.chunks(BATCH_SIZE) {
            let mut transaction = client
                .begin_transaction()
                .await
                .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

            for item in chunk {
                let doc_id = id_extractor(item);
                client
                    .fluent()
                    .delete()
                    .from(collection)
                    .document_id(&doc_id)
                    .add_to_transaction(&mut transaction)
                    .map_err(|e| {
                        AppError::Database(format!(
                            "Failed to add deletion to transaction for {}: {}",
                            collection, e
                        ))
                    })?;
            }

            transaction.commit().await.map_err(|e| {
                AppError::Database(format!("Failed to commit batch deletion: {}", e))
            })?;
        }

        Ok(())
    }
}
