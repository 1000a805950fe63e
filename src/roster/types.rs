//! Core data types for the RSVP roster
//!
//! - `Attendance`: a stored RSVP, immutable once written
//! - `NewAttendance`: the payload of a single submission
//! - `OrderingKey`: arrival order assigned by the store

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Full ordered list of records as delivered to subscribers.
///
/// Shared rather than copied: every subscriber sees the same allocation.
pub type Snapshot = Arc<[Attendance]>;

/// Path of the flag image for a country code
pub fn flag_asset(country_code: &str) -> String {
    format!("img/flags/{}.png", country_code)
}

/// Arrival order of a record, assigned by the store at write time
///
/// Ordered by `timestamp_ms` first, then `sequence`. The sequence breaks
/// ties between writes landing in the same millisecond, so keys handed out
/// by one store are strictly increasing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OrderingKey {
    /// Wall-clock time of the write in milliseconds
    pub timestamp_ms: i64,
    /// Tie-breaker within one millisecond
    pub sequence: u32,
}

impl OrderingKey {
    pub fn new(timestamp_ms: i64, sequence: u32) -> Self {
        Self {
            timestamp_ms,
            sequence,
        }
    }

    /// Smallest key strictly greater than `previous` at wall-clock time `now_ms`
    pub fn next_after(previous: Option<OrderingKey>, now_ms: i64) -> Self {
        match previous {
            Some(prev) if prev.timestamp_ms >= now_ms => {
                match prev.sequence.checked_add(1) {
                    Some(sequence) => Self::new(prev.timestamp_ms, sequence),
                    None => Self::new(prev.timestamp_ms + 1, 0),
                }
            }
            _ => Self::new(now_ms, 0),
        }
    }
}

impl fmt::Display for OrderingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.timestamp_ms, self.sequence)
    }
}

/// A single RSVP as stored
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attendance {
    /// Name shown in the attendee display
    pub display_name: String,
    /// Contact address; kept with the record but never rendered or returned
    #[serde(default, skip_serializing)]
    pub email: String,
    /// Short country identifier (resolves to `img/flags/{code}.png`)
    pub country_code: String,
    /// Human-readable country name
    pub country_name: String,
    /// Arrival order
    pub ordering_key: OrderingKey,
}

impl Attendance {
    /// Flag image for this attendee's country
    pub fn flag_asset(&self) -> String {
        flag_asset(&self.country_code)
    }

    /// One-line announcement used by the attendee display
    pub fn caption(&self) -> String {
        format!(
            "{} from {} is joining the fun!",
            self.display_name, self.country_name
        )
    }
}

/// Payload of a single submission; the store assigns the ordering key
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewAttendance {
    pub display_name: String,
    pub email: String,
    pub country_code: String,
    pub country_name: String,
}

impl NewAttendance {
    pub fn new(
        display_name: impl Into<String>,
        email: impl Into<String>,
        country_code: impl Into<String>,
        country_name: impl Into<String>,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            email: email.into(),
            country_code: country_code.into(),
            country_name: country_name.into(),
        }
    }

    /// Stamp the payload with its ordering key
    pub fn into_record(self, ordering_key: OrderingKey) -> Attendance {
        Attendance {
            display_name: self.display_name,
            email: self.email,
            country_code: self.country_code,
            country_name: self.country_name,
            ordering_key,
        }
    }
}
