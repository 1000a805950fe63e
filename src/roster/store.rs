//! Attendance Store Interface
//!
//! The realtime store is consumed through this trait: a single write
//! operation plus an ordered snapshot subscription. Implementations deliver
//! the full list on every insert, never a diff.

use async_trait::async_trait;
use tokio::sync::broadcast;

use super::error::{RosterError, RosterResult};
use super::types::{Attendance, NewAttendance, Snapshot};

/// Event delivered to subscribers
#[derive(Debug, Clone)]
pub enum SnapshotEvent {
    /// Full ordered list after a change
    Snapshot(Snapshot),
    /// The subscription reported an error; the previous snapshot still stands
    Failed(RosterError),
}

/// Realtime ordered record source with a single write operation
#[async_trait]
pub trait AttendanceStore: Send + Sync {
    /// Write one record; the store assigns its ordering key
    async fn submit(&self, entry: NewAttendance) -> RosterResult<Attendance>;

    /// Subscribe to snapshots, starting with the current one
    async fn subscribe(&self) -> Subscription;

    /// Current records ordered by ordering key
    async fn snapshot(&self) -> Snapshot;

    /// Current record count
    async fn len(&self) -> usize {
        self.snapshot().await.len()
    }
}

/// Handle yielding a sequence of snapshot events
///
/// The first call to [`Subscription::next`] returns the snapshot taken at
/// subscribe time; later calls wait for the store to publish.
pub struct Subscription {
    initial: Option<Snapshot>,
    receiver: broadcast::Receiver<SnapshotEvent>,
}

impl Subscription {
    pub fn new(initial: Snapshot, receiver: broadcast::Receiver<SnapshotEvent>) -> Self {
        Self {
            initial: Some(initial),
            receiver,
        }
    }

    /// Wait for the next event
    ///
    /// Returns `None` once the store has gone away.
    pub async fn next(&mut self) -> Option<RosterResult<Snapshot>> {
        if let Some(initial) = self.initial.take() {
            return Some(Ok(initial));
        }

        loop {
            match self.receiver.recv().await {
                Ok(SnapshotEvent::Snapshot(records)) => return Some(Ok(records)),
                Ok(SnapshotEvent::Failed(error)) => return Some(Err(error)),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    // Snapshots are full lists, so dropping stale ones loses nothing
                    tracing::warn!(skipped, "Roster subscriber lagged, skipping stale snapshots");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
