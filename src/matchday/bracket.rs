//! Champion prediction
//!
//! The bracket form picks one qualified team; submitting it produces the
//! prediction card shown in the modal.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::countries::CountryCatalog;

/// Seconds the prediction and RSVP cards stay up before dismissing themselves
pub const CARD_DISMISS_SECS: u64 = 8;

/// Prediction card content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    pub country_code: String,
    pub country_name: String,
    /// Card title (the team's name)
    pub title: String,
    /// Flag image path
    pub flag: String,
    pub description: String,
    pub dismiss_after_secs: u64,
}

/// Errors that can occur building a prediction
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BracketError {
    /// Nothing was picked; the picker should be flagged
    #[error("No champion selected")]
    NoSelection,

    #[error("Not a qualified team: {0}")]
    UnknownCountry(String),
}

/// Build the prediction card for a picked team
pub fn predict_champion(qualified: &CountryCatalog, code: &str) -> Result<Prediction, BracketError> {
    let code = code.trim();
    if code.is_empty() {
        return Err(BracketError::NoSelection);
    }

    let country = qualified
        .get(code)
        .ok_or_else(|| BracketError::UnknownCountry(code.to_string()))?;

    tracing::debug!(country = %country.code, "Champion predicted");

    Ok(Prediction {
        country_code: country.code.clone(),
        country_name: country.name.clone(),
        title: country.name.clone(),
        flag: country.flag.clone(),
        description: format!(
            "You predict {} to be FIFA World Cup Champions!",
            country.name
        ),
        dismiss_after_secs: CARD_DISMISS_SECS,
    })
}
