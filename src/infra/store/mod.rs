//! Storage boundary - document store abstraction.
//!
//! This module defines the [`Datastore`] trait, the contract between the
//! generic table gateway and whatever backing store the process is wired
//! to. Records are schema-free JSON documents; the store only needs six
//! primitives: get-by-key, insert-with-generated-key, secondary-index
//! equality query, time-range scan, overwrite-by-key, and delete-by-key.
//!
//! Any backend offering those primitives (a key-value store with secondary
//! indexes, a document database, or a relational store with an index table)
//! can implement this trait. [`MemoryStore`] is the reference
//! implementation used for development and tests.

mod error;
mod memory;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// A stored record. The gateway guarantees that documents written through
/// it are JSON objects carrying `created_at` and `updated_at` fields.
pub type Document = serde_json::Value;

/// Document field backing the time index used by ordered queries.
pub const TIME_INDEX: &str = "created_at";

/// Abstract document store, one logical collection per name.
///
/// All operations are a single round-trip: no client-side retry, no
/// backoff. Backend errors surface unwrapped as [`StoreError`].
#[async_trait]
pub trait Datastore: Send + Sync {
    /// Fetch a single document by primary key. `Ok(None)` when absent.
    async fn get(&self, collection: &str, key: &str) -> StoreResult<Option<Document>>;

    /// Insert a document under a store-generated key and return the
    /// generated keys (empty on an anomalous write).
    async fn insert(&self, collection: &str, doc: Document) -> StoreResult<Vec<String>>;

    /// Fetch every document whose `field` equals `value`, ordered by the
    /// time index descending (ties resolved in store-native order).
    async fn get_by_index(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> StoreResult<Vec<Document>>;

    /// Fetch every document whose time index is strictly below `before`,
    /// ordered by the time index descending. The lower bound is open.
    async fn scan_before(
        &self,
        collection: &str,
        before: DateTime<Utc>,
    ) -> StoreResult<Vec<Document>>;

    /// Write a document at a caller-chosen key, replacing any previous
    /// document at that key.
    async fn put(&self, collection: &str, key: &str, doc: Document) -> StoreResult<()>;

    /// Remove the document at `key`. Deleting an absent key succeeds.
    async fn delete(&self, collection: &str, key: &str) -> StoreResult<()>;
}
