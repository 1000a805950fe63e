//! # FanZone
//!
//! RSVP service for the FIFA FanZone 2026 page: takes RSVPs, keeps the
//! attendee roster, and rotates a fixed-size window of attendees on the
//! display page.
//!
//! ## Modules
//!
//! - [`roster`]: Attendance records and the realtime store seam
//! - [`presenter`]: Cyclic window presenter and its render sinks
//! - [`rsvp`]: Form validation and the submission flow
//! - [`matchday`]: Country catalogs, champion prediction, kickoff countdown
//! - [`api`]: REST API server with Axum
//! - [`websocket`]: Live attendee window stream
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fanzone::presenter::{CycleConfig, CyclePresenter, LogSink};
//! use fanzone::roster::{AttendanceStore, MemoryStore, NewAttendance};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(MemoryStore::default());
//!
//!     let presenter = CyclePresenter::new(CycleConfig::default(), Arc::new(LogSink));
//!     let display = presenter.spawn(store.subscribe().await);
//!
//!     store
//!         .submit(NewAttendance::new("Amara", "amara@example.com", "sn", "Senegal"))
//!         .await?;
//!
//!     display.abort();
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod matchday;
pub mod presenter;
pub mod roster;
pub mod rsvp;
pub mod websocket;

// Re-export top-level types for convenience
pub use roster::{
    Attendance, AttendanceStore, MemoryStore, MemoryStoreConfig, NewAttendance, OrderingKey,
    RosterError, RosterResult, Snapshot, Subscription,
};

pub use presenter::{
    CycleConfig, CyclePresenter, CycleWindow, LatestFrame, LogSink, PresenterView, SinkSet,
    WindowEntry, WindowFrame, WindowSink,
};

pub use rsvp::{RsvpDesk, RsvpForm, SubmissionOutcome};

pub use matchday::{predict_champion, BracketError, Countdown, Country, CountryCatalog, Prediction};

pub use api::{build_router, serve, ApiError, AppState};

pub use websocket::{ClientMessage, ConnectionHub, HubConfig, HubError, ServerMessage, WsEvent};

pub use config::{Config, ConfigError, LoggingConfig};
