//! Matchday
//!
//! The page's remaining non-visual pieces:
//!
//! - **countries**: country catalogs for both pickers
//! - **bracket**: champion prediction card
//! - **countdown**: time left until kickoff

pub mod bracket;
pub mod countdown;
pub mod countries;

pub use bracket::{predict_champion, BracketError, Prediction, CARD_DISMISS_SECS};
pub use countdown::{default_kickoff, Countdown, TimeLeft};
pub use countries::{CatalogError, Country, CountryCatalog};
