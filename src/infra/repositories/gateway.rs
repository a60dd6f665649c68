//! Generic document gateway.
//!
//! Every domain repository is built on a [`TableGateway`] bound to one
//! collection. The gateway owns timestamp stamping and the shape of the
//! paginated scan; the [`Datastore`](crate::infra::store::Datastore)
//! behind it only supplies the raw primitives.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

use crate::domain::CommonModel;
use crate::errors::{AppError, AppResult};
use crate::infra::store::{Datastore, Document, StoreError};

/// Gateway for one logical collection.
pub struct TableGateway {
    store: Arc<dyn Datastore>,
    collection: String,
}

impl TableGateway {
    pub fn new(store: Arc<dyn Datastore>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    /// Fetch a single record by primary key.
    ///
    /// An absent key is a genuine [`AppError::NotFound`] at this layer;
    /// repositories that want an `Option` translate it themselves.
    pub async fn get<T>(&self, id: &str) -> AppResult<T>
    where
        T: DeserializeOwned,
    {
        let doc = self
            .store
            .get(&self.collection, id)
            .await?
            .ok_or(AppError::NotFound)?;

        Ok(serde_json::from_value(doc).map_err(StoreError::from)?)
    }

    /// Insert a record and return the store-generated identifier.
    ///
    /// Both timestamps are stamped to now before the write. A write that
    /// yields no generated key is an anomalous, non-partial failure.
    pub async fn create<T>(&self, record: &mut T) -> AppResult<String>
    where
        T: CommonModel + Serialize + Send + Sync,
    {
        let now = Utc::now();
        record.set_created_time(now);
        record.set_last_updated(now);

        let doc = serde_json::to_value(&*record).map_err(StoreError::from)?;
        let keys = self.store.insert(&self.collection, doc).await?;

        let id = keys.into_iter().next().ok_or_else(|| {
            tracing::error!(collection = %self.collection, "insert produced no generated key");
            StoreError::NoGeneratedKey
        })?;

        Ok(id)
    }

    /// Fetch all records whose secondary index `index` equals `value`,
    /// newest first.
    pub async fn get_list<T>(&self, index: &str, value: &str) -> AppResult<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let docs = self.store.get_by_index(&self.collection, index, value).await?;
        decode_all(docs)
    }

    /// Paginated scan: records strictly older than `before` (exclusive
    /// cursor, open lower bound), newest first, filtered, then truncated
    /// to `page_size`.
    ///
    /// `filters` maps a field name to the set of acceptable values:
    /// within one field any listed value matches, across fields every
    /// entry must match. A field with an empty value set contributes no
    /// constraint.
    pub async fn get_page<T>(
        &self,
        before: DateTime<Utc>,
        page_size: usize,
        filters: &HashMap<String, Vec<String>>,
    ) -> AppResult<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let docs = self.store.scan_before(&self.collection, before).await?;

        decode_all(
            docs.into_iter()
                .filter(|doc| matches_filters(doc, filters))
                .take(page_size)
                .collect(),
        )
    }

    /// Stamp last-updated and overwrite the record at `id`.
    pub async fn update<T>(&self, record: &mut T, id: &str) -> AppResult<()>
    where
        T: CommonModel + Serialize + Send + Sync,
    {
        record.set_last_updated(Utc::now());

        let doc = serde_json::to_value(&*record).map_err(StoreError::from)?;
        self.store.put(&self.collection, id, doc).await?;

        Ok(())
    }

    /// Remove the record at `id`; deleting an absent id succeeds.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.store.delete(&self.collection, id).await?;
        Ok(())
    }
}

/// Conjunction across fields of a disjunction across each field's values.
fn matches_filters(doc: &Document, filters: &HashMap<String, Vec<String>>) -> bool {
    filters
        .iter()
        .filter(|(_, allowed)| !allowed.is_empty())
        .all(|(field, allowed)| {
            doc.get(field)
                .and_then(|v| v.as_str())
                .map_or(false, |have| allowed.iter().any(|want| want == have))
        })
}

fn decode_all<T: DeserializeOwned>(docs: Vec<Document>) -> AppResult<Vec<T>> {
    docs.into_iter()
        .map(|doc| {
            serde_json::from_value(doc)
                .map_err(StoreError::from)
                .map_err(AppError::from)
        })
        .collect()
}
