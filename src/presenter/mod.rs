//! Cyclic Window Presenter
//!
//! Shows an unbounded, growing RSVP roster through a fixed-size display by
//! rotating a wrapping window over it on a timer.
//!
//! - **window**: the pure state (`CycleWindow`) and its rendered `WindowFrame`
//! - **cycle**: `CyclePresenter`, which owns the timer and consumes a
//!   roster `Subscription`
//! - **sink**: the `WindowSink` render target and its implementations
//!
//! # Ticks
//!
//! ```text
//! snapshot ──► stop timer → replace + re-clamp cursor → tick → start timer
//! timer    ──► tick
//! tick      =  render frame → sink.display(frame) → advance cursor
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use fanzone::presenter::{CycleConfig, CyclePresenter, LogSink};
//! use fanzone::roster::{AttendanceStore, MemoryStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = MemoryStore::default();
//!     let presenter = CyclePresenter::new(CycleConfig::default(), Arc::new(LogSink));
//!     let handle = presenter.spawn(store.subscribe().await);
//!     // ... submit RSVPs; frames are logged every 5 seconds
//!     handle.abort();
//! }
//! ```

mod cycle;
mod sink;
mod window;

pub use cycle::{CycleConfig, CyclePresenter, PresenterView};
pub use sink::{LatestFrame, LogSink, SinkSet, WindowSink};
pub use window::{CycleWindow, WindowEntry, WindowFrame, EMPTY_ROSTER_MESSAGE};
