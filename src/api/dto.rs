//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::matchday::{Country, TimeLeft};
use crate::presenter::WindowFrame;

// ============================================
// RSVP DTOs
// ============================================

/// Attendee count response
#[derive(Debug, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: usize,
}

/// Attendee window response
#[derive(Debug, Serialize, Deserialize)]
pub struct WindowResponse {
    /// Frame currently on display
    pub frame: WindowFrame,
    /// Index the next tick starts from, when the display is running
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<usize>,
}

// ============================================
// MATCHDAY DTOs
// ============================================

/// Country picker options
#[derive(Debug, Serialize, Deserialize)]
pub struct CountriesResponse {
    pub count: usize,
    pub countries: Vec<Country>,
}

/// Champion prediction request
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct BracketRequest {
    #[serde(default)]
    pub country_code: String,
}

/// Countdown response
#[derive(Debug, Serialize, Deserialize)]
pub struct CountdownResponse {
    pub kickoff: DateTime<Utc>,
    /// Kickoff has passed; every unit is zero
    pub started: bool,
    #[serde(flatten)]
    pub remaining: TimeLeft,
    /// "DDd HHh MMm SSs"
    pub display: String,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health status response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status: healthy, degraded
    pub status: String,
    /// Attendee display status: running, detached
    pub presenter: String,
    /// Records in the roster
    pub attendees: usize,
    /// Open WebSocket connections
    pub ws_connections: usize,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}
