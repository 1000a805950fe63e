//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::Instant;

use crate::config::ApiConfig;
use crate::matchday::{Countdown, CountryCatalog};
use crate::presenter::{LatestFrame, LogSink, PresenterView, SinkSet};
use crate::roster::AttendanceStore;
use crate::rsvp::RsvpDesk;
use crate::websocket::{ConnectionHub, HubConfig, WsEvent};

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Validates and records RSVPs
    pub desk: RsvpDesk,
    /// Roster backing the desk and the display
    pub store: Arc<dyn AttendanceStore>,
    /// Champion picker options
    pub qualified: Arc<CountryCatalog>,
    /// Home country picker options
    pub all_countries: Arc<CountryCatalog>,
    /// Kickoff countdown
    pub countdown: Countdown,
    /// Frame currently on display
    pub latest: LatestFrame,
    /// WebSocket connection hub for real-time streaming
    pub ws_hub: Arc<ConnectionHub>,
    /// Attached once the attendee display is running
    pub presenter: Option<PresenterView>,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(
        store: Arc<dyn AttendanceStore>,
        qualified: CountryCatalog,
        all_countries: CountryCatalog,
        countdown: Countdown,
        config: ApiConfig,
    ) -> Self {
        Self::with_ws_config(
            store,
            qualified,
            all_countries,
            countdown,
            config,
            HubConfig::default(),
        )
    }

    /// Create AppState with custom WebSocket hub configuration
    pub fn with_ws_config(
        store: Arc<dyn AttendanceStore>,
        qualified: CountryCatalog,
        all_countries: CountryCatalog,
        countdown: Countdown,
        config: ApiConfig,
        hub_config: HubConfig,
    ) -> Self {
        let all_countries = Arc::new(all_countries);

        Self {
            desk: RsvpDesk::new(Arc::clone(&store), Arc::clone(&all_countries)),
            store,
            qualified: Arc::new(qualified),
            all_countries,
            countdown,
            latest: LatestFrame::new(),
            ws_hub: Arc::new(ConnectionHub::new(hub_config)),
            presenter: None,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Tell every `system` subscriber something
    pub fn announce(&self, message: &str) {
        self.ws_hub.publish(WsEvent::system(message));
    }

    /// Builder method: attach the running presenter for health reporting
    pub fn with_presenter(mut self, view: PresenterView) -> Self {
        self.presenter = Some(view);
        self
    }

    /// Sinks the presenter should render into: the hub, the latest-frame
    /// slot and the log
    pub fn window_sinks(&self) -> SinkSet {
        SinkSet::new()
            .with(self.ws_hub.clone())
            .with(Arc::new(self.latest.clone()))
            .with(Arc::new(LogSink))
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Get WebSocket connection count
    pub fn ws_connection_count(&self) -> usize {
        self.ws_hub.connection_count()
    }
}
