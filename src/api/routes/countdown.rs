//! Countdown Routes
//!
//! - GET /api/v1/countdown - Time left until kickoff

use axum::{extract::State, Json};
use chrono::Utc;
use std::sync::Arc;

use crate::api::dto::CountdownResponse;
use crate::api::state::AppState;

/// GET /api/v1/countdown
pub async fn countdown(State(state): State<Arc<AppState>>) -> Json<CountdownResponse> {
    let now = Utc::now();
    let remaining = state.countdown.remaining_at(now);

    Json(CountdownResponse {
        kickoff: state.countdown.kickoff(),
        started: state.countdown.has_started_at(now),
        remaining,
        display: remaining.to_string(),
    })
}
