//! Document gateway semantics against the in-memory backend.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use keygate::errors::AppError;
use keygate::infra::{Datastore, MemoryStore, TableGateway};
use keygate::CommonModel;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Ticket {
    #[serde(default)]
    id: String,
    label: String,
    status: String,
    region: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Ticket {
    fn new(label: &str, status: &str, region: &str) -> Self {
        let now = Utc::now();
        Self {
            id: String::new(),
            label: label.to_string(),
            status: status.to_string(),
            region: region.to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl CommonModel for Ticket {
    fn set_created_time(&mut self, at: DateTime<Utc>) {
        self.created_at = at;
    }

    fn set_last_updated(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
}

fn gateway() -> TableGateway {
    let store: Arc<dyn Datastore> = Arc::new(MemoryStore::new());
    TableGateway::new(store, "tickets")
}

/// Write a ticket at a chosen key with a chosen creation time, so the
/// time index is under the test's control.
async fn seed(
    gw: &TableGateway,
    key: &str,
    status: &str,
    region: &str,
    created_at: DateTime<Utc>,
) {
    let mut ticket = Ticket::new(key, status, region);
    ticket.created_at = created_at;
    gw.update(&mut ticket, key).await.unwrap();
}

fn filters(entries: &[(&str, &[&str])]) -> HashMap<String, Vec<String>> {
    entries
        .iter()
        .map(|(k, vs)| (k.to_string(), vs.iter().map(|v| v.to_string()).collect()))
        .collect()
}

fn labels(page: &[Ticket]) -> Vec<&str> {
    page.iter().map(|t| t.label.as_str()).collect()
}

#[tokio::test]
async fn test_create_stamps_both_timestamps_and_returns_id() {
    let gw = gateway();
    let mut ticket = Ticket::new("a", "open", "x");
    ticket.created_at = DateTime::<Utc>::MIN_UTC;
    ticket.updated_at = DateTime::<Utc>::MIN_UTC;

    let before = Utc::now();
    let id = gw.create(&mut ticket).await.unwrap();
    let after = Utc::now();

    assert!(!id.is_empty());
    assert!(ticket.created_at >= before && ticket.created_at <= after);
    assert_eq!(ticket.created_at, ticket.updated_at);

    let fetched: Ticket = gw.get(&id).await.unwrap();
    assert_eq!(fetched.id, id);
    assert_eq!(fetched.label, "a");
}

#[tokio::test]
async fn test_get_missing_record_is_not_found() {
    let gw = gateway();
    let err = gw.get::<Ticket>("nope").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}

#[tokio::test]
async fn test_get_list_filters_by_index_newest_first() {
    let gw = gateway();
    let base = Utc::now();
    seed(&gw, "t1", "open", "x", base + Duration::seconds(1)).await;
    seed(&gw, "t2", "closed", "x", base + Duration::seconds(2)).await;
    seed(&gw, "t3", "open", "y", base + Duration::seconds(3)).await;

    let open: Vec<Ticket> = gw.get_list("status", "open").await.unwrap();
    assert_eq!(labels(&open), vec!["t3", "t1"]);

    let none: Vec<Ticket> = gw.get_list("status", "reopened").await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_page_cursor_is_exclusive_and_descending() {
    let gw = gateway();
    let base = Utc::now();
    for i in [10i64, 9, 8, 7, 6, 5] {
        seed(&gw, &format!("t{i}"), "open", "x", base + Duration::seconds(i)).await;
    }

    let cursor = base + Duration::seconds(8);
    let all: Vec<Ticket> = gw.get_page(cursor, 10, &HashMap::new()).await.unwrap();
    assert_eq!(labels(&all), vec!["t7", "t6", "t5"]);

    let page: Vec<Ticket> = gw.get_page(cursor, 2, &HashMap::new()).await.unwrap();
    assert_eq!(labels(&page), vec!["t7", "t6"]);
}

#[tokio::test]
async fn test_page_filters_or_within_key_and_across_keys() {
    let gw = gateway();
    let base = Utc::now();
    seed(&gw, "t1", "a", "x", base + Duration::seconds(1)).await;
    seed(&gw, "t2", "b", "y", base + Duration::seconds(2)).await;
    seed(&gw, "t3", "c", "x", base + Duration::seconds(3)).await;
    seed(&gw, "t4", "a", "y", base + Duration::seconds(4)).await;

    let cursor = base + Duration::seconds(60);

    let by_status: Vec<Ticket> = gw
        .get_page(cursor, 10, &filters(&[("status", &["a", "b"])]))
        .await
        .unwrap();
    assert_eq!(labels(&by_status), vec!["t4", "t2", "t1"]);

    let both: Vec<Ticket> = gw
        .get_page(
            cursor,
            10,
            &filters(&[("status", &["a", "b"]), ("region", &["x"])]),
        )
        .await
        .unwrap();
    assert_eq!(labels(&both), vec!["t1"]);

    // An empty value set contributes no constraint
    let unconstrained: Vec<Ticket> = gw
        .get_page(cursor, 10, &filters(&[("status", &[])]))
        .await
        .unwrap();
    assert_eq!(unconstrained.len(), 4);
}

#[tokio::test]
async fn test_page_limit_applies_after_filtering() {
    let gw = gateway();
    let base = Utc::now();
    seed(&gw, "t1", "a", "x", base + Duration::seconds(1)).await;
    seed(&gw, "t2", "b", "x", base + Duration::seconds(2)).await;
    seed(&gw, "t3", "a", "x", base + Duration::seconds(3)).await;

    // With the limit applied before filtering this would only see t3
    let page: Vec<Ticket> = gw
        .get_page(
            base + Duration::seconds(60),
            2,
            &filters(&[("status", &["a"])]),
        )
        .await
        .unwrap();
    assert_eq!(labels(&page), vec!["t3", "t1"]);
}

#[tokio::test]
async fn test_update_stamps_last_updated_and_keeps_created() {
    let gw = gateway();
    let mut ticket = Ticket::new("a", "open", "x");
    let id = gw.create(&mut ticket).await.unwrap();
    let created = ticket.created_at;

    ticket.status = "closed".to_string();
    gw.update(&mut ticket, &id).await.unwrap();

    let fetched: Ticket = gw.get(&id).await.unwrap();
    assert_eq!(fetched.status, "closed");
    assert_eq!(fetched.created_at, created);
    assert!(fetched.updated_at >= created);
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let gw = gateway();
    let mut ticket = Ticket::new("a", "open", "x");
    let id = gw.create(&mut ticket).await.unwrap();

    gw.delete(&id).await.unwrap();
    gw.delete(&id).await.unwrap();

    let err = gw.get::<Ticket>(&id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}
