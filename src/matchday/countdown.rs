//! Kickoff countdown

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

const MS_PER_SECOND: i64 = 1000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Kickoff of the opening match
pub fn default_kickoff() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 11, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Time left until kickoff, split into clock units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeLeft {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl TimeLeft {
    pub const ZERO: TimeLeft = TimeLeft {
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    /// Split a millisecond duration, rounding down; negative means zero
    pub fn from_millis(ms: i64) -> Self {
        if ms <= 0 {
            return Self::ZERO;
        }
        Self {
            days: ms / MS_PER_DAY,
            hours: (ms % MS_PER_DAY) / MS_PER_HOUR,
            minutes: (ms % MS_PER_HOUR) / MS_PER_MINUTE,
            seconds: (ms % MS_PER_MINUTE) / MS_PER_SECOND,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Clock faces: each unit zero-padded to at least two digits
    pub fn padded(&self) -> [String; 4] {
        [
            format!("{:02}", self.days),
            format!("{:02}", self.hours),
            format!("{:02}", self.minutes),
            format!("{:02}", self.seconds),
        ]
    }
}

impl fmt::Display for TimeLeft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [d, h, m, s] = self.padded();
        write!(f, "{}d {}h {}m {}s", d, h, m, s)
    }
}

/// Countdown to a fixed kickoff instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    kickoff: DateTime<Utc>,
}

impl Countdown {
    pub fn new(kickoff: DateTime<Utc>) -> Self {
        Self { kickoff }
    }

    pub fn kickoff(&self) -> DateTime<Utc> {
        self.kickoff
    }

    /// Time left as seen at `now`
    pub fn remaining_at(&self, now: DateTime<Utc>) -> TimeLeft {
        TimeLeft::from_millis((self.kickoff - now).num_milliseconds())
    }

    /// Time left right now
    pub fn remaining(&self) -> TimeLeft {
        self.remaining_at(Utc::now())
    }

    pub fn has_started_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.kickoff
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(default_kickoff())
    }
}
