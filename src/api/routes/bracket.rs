//! Bracket Routes
//!
//! - POST /api/v1/bracket - Predict the champion

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::BracketRequest;
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::matchday::{predict_champion, Prediction};

/// POST /api/v1/bracket
///
/// 400 when nothing was picked or the pick is not a qualified team.
pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<BracketRequest>, JsonRejection>,
) -> ApiResult<Json<Prediction>> {
    let Json(req) = payload?;
    let prediction = predict_champion(&state.qualified, &req.country_code)?;
    Ok(Json(prediction))
}
