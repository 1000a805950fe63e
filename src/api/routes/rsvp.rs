//! RSVP Routes
//!
//! - POST /api/v1/rsvps - Submit the RSVP form
//! - GET /api/v1/rsvps/count - Attendees so far
//! - GET /api/v1/rsvps/window - Attendee window on display

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::dto::{CountResponse, WindowResponse};
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::rsvp::{RsvpForm, SubmissionOutcome};

/// POST /api/v1/rsvps
///
/// 201 when stored, 422 when the form is invalid, 502 when the store fails
/// the write. The body always carries the form to show next. A body that
/// is not an RSVP form at all is a 400.
///
/// Accepted RSVPs are announced on the `system` topic.
pub async fn submit_rsvp(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RsvpForm>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SubmissionOutcome>)> {
    let Json(form) = payload?;
    let outcome = state.desk.submit(form).await;

    let status = match &outcome {
        SubmissionOutcome::Accepted { record, .. } => {
            tracing::info!(
                country = %record.country_code,
                key = %record.ordering_key,
                "RSVP accepted"
            );
            state.announce(&record.caption());
            StatusCode::CREATED
        }
        SubmissionOutcome::Invalid { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        SubmissionOutcome::Failed { .. } => StatusCode::BAD_GATEWAY,
    };

    Ok((status, Json(outcome)))
}

/// GET /api/v1/rsvps/count
pub async fn count_rsvps(State(state): State<Arc<AppState>>) -> Json<CountResponse> {
    Json(CountResponse {
        count: state.desk.count().await,
    })
}

/// GET /api/v1/rsvps/window
///
/// Last frame the presenter displayed.
pub async fn current_window(State(state): State<Arc<AppState>>) -> Json<WindowResponse> {
    let next_cursor = match &state.presenter {
        Some(view) => Some(view.cursor().await),
        None => None,
    };

    Json(WindowResponse {
        frame: state.latest.current(),
        next_cursor,
    })
}
