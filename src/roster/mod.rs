//! RSVP Roster
//!
//! The attendance records and the realtime store they live in:
//!
//! - **types**: `Attendance`, `NewAttendance`, `OrderingKey`
//! - **store**: the `AttendanceStore` trait and the `Subscription` handle
//! - **memory**: in-process `MemoryStore`
//! - **error**: error types
//!
//! # Flow
//!
//! ```text
//! submit(NewAttendance) → assign OrderingKey → append → publish full snapshot
//!                                                        │
//!                        Subscription::next() ◄──────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use fanzone::roster::{AttendanceStore, MemoryStore, NewAttendance};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MemoryStore::default();
//!     let mut subscription = store.subscribe().await;
//!
//!     store
//!         .submit(NewAttendance::new("Ada", "ada@example.com", "gb-eng", "England"))
//!         .await?;
//!
//!     // Initial (empty) snapshot, then one snapshot per insert
//!     while let Some(Ok(records)) = subscription.next().await {
//!         println!("{} attending", records.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod memory;
pub mod store;
pub mod types;

pub use error::{RosterError, RosterResult};
pub use memory::{MemoryStore, MemoryStoreConfig};
pub use store::{AttendanceStore, SnapshotEvent, Subscription};
pub use types::{flag_asset, Attendance, NewAttendance, OrderingKey, Snapshot};
