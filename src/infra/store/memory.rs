//! In-memory document store.
//!
//! Reference [`Datastore`] backend: collections are `BTreeMap`s of JSON
//! documents behind a [`parking_lot::RwLock`]. Suitable for development
//! and tests; data is lost when the process exits. Lock sections never
//! hold across an await point.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

use super::{Datastore, Document, StoreResult, TIME_INDEX};

/// In-memory [`Datastore`] implementation.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, BTreeMap<String, Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Time-index value of a document; documents without a parseable value
/// sort last.
fn time_index_of(doc: &Document) -> DateTime<Utc> {
    doc.get(TIME_INDEX)
        .and_then(|v| v.as_str())
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

fn key_of(doc: &Document) -> &str {
    doc.get("id").and_then(|v| v.as_str()).unwrap_or_default()
}

/// Sort newest first, ties broken by key so results are deterministic.
fn sort_descending(docs: &mut [Document]) {
    docs.sort_by(|a, b| {
        time_index_of(b)
            .cmp(&time_index_of(a))
            .then_with(|| key_of(b).cmp(key_of(a)))
    });
}

#[async_trait]
impl Datastore for MemoryStore {
    async fn get(&self, collection: &str, key: &str) -> StoreResult<Option<Document>> {
        let collections = self.collections.read();
        Ok(collections
            .get(collection)
            .and_then(|table| table.get(key))
            .cloned())
    }

    async fn insert(&self, collection: &str, mut doc: Document) -> StoreResult<Vec<String>> {
        let key = Uuid::new_v4().to_string();
        if let Some(obj) = doc.as_object_mut() {
            obj.insert("id".to_string(), Document::from(key.clone()));
        }

        let mut collections = self.collections.write();
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(key.clone(), doc);

        Ok(vec![key])
    }

    async fn get_by_index(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> StoreResult<Vec<Document>> {
        let collections = self.collections.read();
        let mut matches: Vec<Document> = collections
            .get(collection)
            .map(|table| {
                table
                    .values()
                    .filter(|doc| doc.get(field).and_then(|v| v.as_str()) == Some(value))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        drop(collections);

        sort_descending(&mut matches);
        Ok(matches)
    }

    async fn scan_before(
        &self,
        collection: &str,
        before: DateTime<Utc>,
    ) -> StoreResult<Vec<Document>> {
        let collections = self.collections.read();
        let mut matches: Vec<Document> = collections
            .get(collection)
            .map(|table| {
                table
                    .values()
                    .filter(|doc| time_index_of(doc) < before)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        drop(collections);

        sort_descending(&mut matches);
        Ok(matches)
    }

    async fn put(&self, collection: &str, key: &str, mut doc: Document) -> StoreResult<()> {
        if let Some(obj) = doc.as_object_mut() {
            obj.insert("id".to_string(), Document::from(key.to_string()));
        }

        let mut collections = self.collections.write();
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(key.to_string(), doc);

        Ok(())
    }

    async fn delete(&self, collection: &str, key: &str) -> StoreResult<()> {
        let mut collections = self.collections.write();
        if let Some(table) = collections.get_mut(collection) {
            table.remove(key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_insert_generates_distinct_keys() {
        let store = MemoryStore::new();
        let k1 = store.insert("t", json!({"a": 1})).await.unwrap();
        let k2 = store.insert("t", json!({"a": 2})).await.unwrap();

        assert_eq!(k1.len(), 1);
        assert_ne!(k1[0], k2[0]);
    }

    #[tokio::test]
    async fn test_get_returns_inserted_document_with_id() {
        let store = MemoryStore::new();
        let keys = store.insert("t", json!({"a": 1})).await.unwrap();

        let doc = store.get("t", &keys[0]).await.unwrap().unwrap();
        assert_eq!(doc["a"], 1);
        assert_eq!(doc["id"], keys[0].as_str());
    }

    #[tokio::test]
    async fn test_put_replaces_existing_document() {
        let store = MemoryStore::new();
        store.put("t", "k", json!({"v": "old"})).await.unwrap();
        store.put("t", "k", json!({"v": "new"})).await.unwrap();

        let doc = store.get("t", "k").await.unwrap().unwrap();
        assert_eq!(doc["v"], "new");
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemoryStore::new();
        store.put("t", "k", json!({})).await.unwrap();

        store.delete("t", "k").await.unwrap();
        store.delete("t", "k").await.unwrap();
        assert!(store.get("t", "k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_collection_reads_as_empty() {
        let store = MemoryStore::new();
        assert!(store.get("none", "k").await.unwrap().is_none());
        assert!(store.get_by_index("none", "f", "v").await.unwrap().is_empty());
        assert!(store.scan_before("none", Utc::now()).await.unwrap().is_empty());
    }
}
