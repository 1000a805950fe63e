//! In-process attendance store
//!
//! Keeps the roster in memory and publishes a full snapshot on every insert
//! through a tokio broadcast channel. Publishing happens while the write lock
//! is held; `subscribe` takes the read lock before creating its receiver, so
//! a subscriber sees every insert after its initial snapshot exactly once.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

use super::error::{RosterError, RosterResult};
use super::store::{AttendanceStore, SnapshotEvent, Subscription};
use super::types::{Attendance, NewAttendance, OrderingKey, Snapshot};

/// Configuration for the in-process store
#[derive(Debug, Clone)]
pub struct MemoryStoreConfig {
    /// Capacity of the snapshot broadcast channel
    pub broadcast_capacity: usize,
}

impl Default for MemoryStoreConfig {
    fn default() -> Self {
        Self {
            broadcast_capacity: 64,
        }
    }
}

#[derive(Default)]
struct Ledger {
    records: Vec<Attendance>,
    last_key: Option<OrderingKey>,
}

impl Ledger {
    fn snapshot(&self) -> Snapshot {
        Arc::from(self.records.as_slice())
    }
}

/// In-memory realtime roster
pub struct MemoryStore {
    ledger: RwLock<Ledger>,
    events: broadcast::Sender<SnapshotEvent>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new(config: MemoryStoreConfig) -> Self {
        let (events, _) = broadcast::channel(config.broadcast_capacity.max(1));
        Self {
            ledger: RwLock::new(Ledger::default()),
            events,
        }
    }

    /// Create a store pre-loaded with records
    ///
    /// Records are sorted by ordering key; later writes are keyed after the
    /// largest one.
    pub fn with_records(config: MemoryStoreConfig, mut records: Vec<Attendance>) -> Self {
        records.sort_by_key(|r| r.ordering_key);
        let last_key = records.last().map(|r| r.ordering_key);

        let (events, _) = broadcast::channel(config.broadcast_capacity.max(1));
        Self {
            ledger: RwLock::new(Ledger { records, last_key }),
            events,
        }
    }

    /// Report a subscription failure to every subscriber
    ///
    /// Subscribers keep their last snapshot; nothing is removed.
    pub fn report_failure(&self, error: RosterError) {
        tracing::warn!(error = %error, "Publishing roster subscription failure");
        let _ = self.events.send(SnapshotEvent::Failed(error));
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.events.receiver_count()
    }

    fn check(entry: &NewAttendance) -> RosterResult<()> {
        if entry.display_name.trim().is_empty() {
            return Err(RosterError::Rejected("display name is blank".to_string()));
        }
        if entry.country_code.trim().is_empty() {
            return Err(RosterError::Rejected("country code is blank".to_string()));
        }
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(MemoryStoreConfig::default())
    }
}

#[async_trait]
impl AttendanceStore for MemoryStore {
    async fn submit(&self, entry: NewAttendance) -> RosterResult<Attendance> {
        Self::check(&entry)?;

        let mut ledger = self.ledger.write().await;
        let key = OrderingKey::next_after(ledger.last_key, Utc::now().timestamp_millis());
        let record = entry.into_record(key);

        ledger.records.push(record.clone());
        ledger.last_key = Some(key);

        let snapshot = ledger.snapshot();
        let delivered = self.events.send(SnapshotEvent::Snapshot(snapshot)).unwrap_or(0);

        tracing::info!(
            ordering_key = %key,
            country = %record.country_code,
            total = ledger.records.len(),
            subscribers = delivered,
            "RSVP recorded"
        );

        Ok(record)
    }

    async fn subscribe(&self) -> Subscription {
        let ledger = self.ledger.read().await;
        let receiver = self.events.subscribe();
        Subscription::new(ledger.snapshot(), receiver)
    }

    async fn snapshot(&self) -> Snapshot {
        self.ledger.read().await.snapshot()
    }

    async fn len(&self) -> usize {
        self.ledger.read().await.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str) -> NewAttendance {
        NewAttendance::new(name, format!("{}@example.com", name), "mx", "Mexico")
    }

    #[tokio::test]
    async fn test_submit_assigns_increasing_keys() {
        let store = MemoryStore::default();

        let a = store.submit(entry("ana")).await.unwrap();
        let b = store.submit(entry("beto")).await.unwrap();
        let c = store.submit(entry("caro")).await.unwrap();

        assert!(a.ordering_key < b.ordering_key);
        assert!(b.ordering_key < c.ordering_key);

        let snapshot = store.snapshot().await;
        let names: Vec<_> = snapshot.iter().map(|r| r.display_name.as_str()).collect();
        assert_eq!(names, vec!["ana", "beto", "caro"]);
        assert_eq!(store.len().await, 3);
    }

    #[tokio::test]
    async fn test_submit_rejects_blank_fields() {
        let store = MemoryStore::default();

        let result = store
            .submit(NewAttendance::new("  ", "a@b.c", "mx", "Mexico"))
            .await;
        assert!(matches!(result, Err(RosterError::Rejected(_))));

        let result = store
            .submit(NewAttendance::new("Ana", "a@b.c", "", "Mexico"))
            .await;
        assert!(matches!(result, Err(RosterError::Rejected(_))));

        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_subscription_sees_every_insert() {
        let store = MemoryStore::default();
        store.submit(entry("ana")).await.unwrap();

        let mut sub = store.subscribe().await;
        store.submit(entry("beto")).await.unwrap();
        store.submit(entry("caro")).await.unwrap();

        let lens: Vec<usize> = vec![
            sub.next().await.unwrap().unwrap().len(),
            sub.next().await.unwrap().unwrap().len(),
            sub.next().await.unwrap().unwrap().len(),
        ];
        assert_eq!(lens, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_report_failure_reaches_subscribers() {
        let store = MemoryStore::default();
        let mut sub = store.subscribe().await;
        sub.next().await;

        store.report_failure(RosterError::Subscription("quota exceeded".to_string()));

        let event = sub.next().await.unwrap();
        assert_eq!(
            event.unwrap_err(),
            RosterError::Subscription("quota exceeded".to_string())
        );
    }

    #[tokio::test]
    async fn test_with_records_sorts_and_continues_keys() {
        let older = entry("old").into_record(OrderingKey::new(10, 0));
        let newer = entry("new").into_record(OrderingKey::new(20, 0));
        let store = MemoryStore::with_records(MemoryStoreConfig::default(), vec![newer, older]);

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot[0].display_name, "old");
        assert_eq!(snapshot[1].display_name, "new");

        let next = store.submit(entry("next")).await.unwrap();
        assert!(next.ordering_key > OrderingKey::new(20, 0));
    }

    #[tokio::test]
    async fn test_subscriber_count() {
        let store = MemoryStore::default();
        assert_eq!(store.subscriber_count(), 0);

        let sub = store.subscribe().await;
        assert_eq!(store.subscriber_count(), 1);

        drop(sub);
        assert_eq!(store.subscriber_count(), 0);
    }
}
