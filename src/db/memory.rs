// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process document store used for local development and tests.
//!
//! Documents are kept as JSON values keyed by `(collection, id)`. Inserts go
//! through the map's entry API, so a duplicate ID is rejected atomically in
//! the same way Firestore rejects a create on an existing document.

use crate::error::AppError;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;

type DocKey = (String, String);

#[derive(Default)]
pub struct MemoryStore {
    docs: DashMap<DocKey, Value>,
}

fn encode<T: Serialize>(doc: &T) -> Result<Value, AppError> {
    serde_json::to_value(doc).map_err(|e| AppError::Database(format!("Failed to encode document: {}", e)))
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, AppError> {
    serde_json::from_value(value).map_err(|e| AppError::Database(format!("Failed to decode document: {}", e)))
}

/// Order two JSON field values: numbers numerically, strings lexically,
/// missing values first.
fn compare_fields(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(collection: &str, id: &str) -> DocKey {
        (collection.to_string(), id.to_string())
    }

    pub fn get<T: DeserializeOwned>(&self, collection: &str, id: &str) -> Result<Option<T>, AppError> {
        self.docs
            .get(&Self::key(collection, id))
            .map(|doc| decode(doc.value().clone()))
            .transpose()
    }

    /// Create a document; fails with `Conflict` if the ID is taken.
    pub fn insert<T: Serialize>(&self, collection: &str, id: &str, doc: &T) -> Result<(), AppError> {
        let value = encode(doc)?;
        match self.docs.entry(Self::key(collection, id)) {
            Entry::Occupied(_) => Err(AppError::Conflict(format!(
                "Document {}/{} already exists",
                collection, id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(value);
                Ok(())
            }
        }
    }

    /// Create or overwrite a document.
    pub fn put<T: Serialize>(&self, collection: &str, id: &str, doc: &T) -> Result<(), AppError> {
        self.docs.insert(Self::key(collection, id), encode(doc)?);
        Ok(())
    }

    /// Remove a document; returns whether it existed.
    pub fn remove(&self, collection: &str, id: &str) -> bool {
        self.docs.remove(&Self::key(collection, id)).is_some()
    }

    /// Documents of a collection, optionally filtered on an integer field,
    /// ascending by `order_by` (ties broken by document ID).
    pub fn query<T: DeserializeOwned>(
        &self,
        collection: &str,
        filter: Option<(&str, i64)>,
        order_by: &str,
    ) -> Result<Vec<T>, AppError> {
        let mut matching: Vec<(String, Value)> = self
            .docs
            .iter()
            .filter(|entry| entry.key().0 == collection)
            .filter(|entry| match filter {
                Some((field, expected)) => entry.value().get(field).and_then(Value::as_i64) == Some(expected),
                None => true,
            })
            .map(|entry| (entry.key().1.clone(), entry.value().clone()))
            .collect();

        matching.sort_by(|(id_a, a), (id_b, b)| {
            compare_fields(a.get(order_by), b.get(order_by)).then_with(|| id_a.cmp(id_b))
        });

        matching.into_iter().map(|(_, value)| decode(value)).collect()
    }

    /// Remove every document of a collection; returns how many were removed.
    pub fn clear(&self, collection: &str) -> usize {
        let mut removed = 0usize;
        self.docs.retain(|key, _| {
            let keep = key.0 != collection;
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Doc {
        n: i64,
        group: i64,
        at: String,
    }

    fn doc(n: i64, group: i64, at: &str) -> Doc {
        Doc {
            n,
            group,
            at: at.to_string(),
        }
    }

    #[test]
    fn test_insert_rejects_duplicate_id() {
        let store = MemoryStore::new();
        store.insert("things", "1", &doc(1, 0, "a")).unwrap();
        let err = store.insert("things", "1", &doc(2, 0, "b")).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let kept: Doc = store.get("things", "1").unwrap().unwrap();
        assert_eq!(kept.n, 1);
    }

    #[test]
    fn test_same_id_in_different_collections() {
        let store = MemoryStore::new();
        store.insert("a", "1", &doc(1, 0, "x")).unwrap();
        store.insert("b", "1", &doc(1, 0, "x")).unwrap();
        assert_eq!(store.clear("a"), 1);
        assert!(store.get::<Doc>("b", "1").unwrap().is_some());
    }

    #[test]
    fn test_clear_while_other_collection_grows() {
        let store = std::sync::Arc::new(MemoryStore::new());
        for i in 0..200 {
            store.insert("a", &i.to_string(), &doc(i, 0, "x")).unwrap();
        }

        let writer = {
            let store = store.clone();
            std::thread::spawn(move || {
                for i in 0..2000 {
                    store.insert("b", &i.to_string(), &doc(i, 0, "x")).unwrap();
                }
            })
        };
        let removed = store.clear("a");
        writer.join().unwrap();

        assert_eq!(removed, 200);
        assert_eq!(store.query::<Doc>("b", None, "n").unwrap().len(), 2000);
    }

    #[test]
    fn test_query_filters_and_orders() {
        let store = MemoryStore::new();
        store.put("things", "c", &doc(10, 1, "2024-06-03T00:00:00Z")).unwrap();
        store.put("things", "a", &doc(2, 1, "2024-06-01T00:00:00Z")).unwrap();
        store.put("things", "b", &doc(3, 2, "2024-06-02T00:00:00Z")).unwrap();

        let by_number: Vec<Doc> = store.query("things", None, "n").unwrap();
        assert_eq!(
            by_number.iter().map(|d| d.n).collect::<Vec<_>>(),
            vec![2, 3, 10]
        );

        let group_one: Vec<Doc> = store.query("things", Some(("group", 1)), "at").unwrap();
        assert_eq!(
            group_one.iter().map(|d| d.n).collect::<Vec<_>>(),
            vec![2, 10]
        );
    }

    #[test]
    fn test_remove_reports_existence() {
        let store = MemoryStore::new();
        assert!(!store.remove("things", "x"));
        store.put("things", "x", &doc(1, 0, "a")).unwrap();
        assert!(store.remove("things", "x"));
    }
}
