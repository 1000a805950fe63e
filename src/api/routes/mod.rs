//! API Routes
//!
//! Route handlers organized by functionality.

pub mod bracket;
pub mod countdown;
pub mod countries;
pub mod health;
pub mod rsvp;

use axum::http::Uri;

use crate::api::error::ApiError;

/// Fallback for paths no route matches
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(uri.path().to_string())
}
