//! Country Routes
//!
//! - GET /api/v1/countries/qualified - Champion picker options
//! - GET /api/v1/countries/all - Home country picker options

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::CountriesResponse;
use crate::api::state::AppState;
use crate::matchday::CountryCatalog;

fn listing(catalog: &CountryCatalog) -> CountriesResponse {
    CountriesResponse {
        count: catalog.len(),
        countries: catalog.countries().to_vec(),
    }
}

/// GET /api/v1/countries/qualified
pub async fn qualified_countries(State(state): State<Arc<AppState>>) -> Json<CountriesResponse> {
    Json(listing(&state.qualified))
}

/// GET /api/v1/countries/all
pub async fn all_countries(State(state): State<Arc<AppState>>) -> Json<CountriesResponse> {
    Json(listing(&state.all_countries))
}
