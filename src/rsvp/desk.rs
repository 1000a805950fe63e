//! RSVP submission
//!
//! Validates a form, writes it to the store and reports one of three
//! outcomes. The form is only cleared after the store confirms the write;
//! a failed write hands the entered values back untouched.

use serde::Serialize;
use std::sync::Arc;

use super::form::{FieldError, RsvpForm};
use crate::matchday::{CountryCatalog, CARD_DISMISS_SECS};
use crate::roster::{Attendance, AttendanceStore};

/// Shown when the store refuses or fails the write
pub const SUBMIT_FAILURE_NOTICE: &str =
    "Oops! There was an error submitting your RSVP. Please try again.";

const WELCOME: &str = "Thank you for joining the FIFA FanZone 2026! You're all set to celebrate the beautiful game with us!";

/// Success card content
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Confirmation {
    pub title: String,
    pub description: String,
    pub dismiss_after_secs: u64,
}

impl Confirmation {
    fn for_name(name: &str) -> Self {
        Self {
            title: format!("RSVP Successful, {}!", name),
            description: WELCOME.to_string(),
            dismiss_after_secs: CARD_DISMISS_SECS,
        }
    }
}

/// Result of one submission attempt
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmissionOutcome {
    /// Stored; the returned form is blank, ready for the next guest
    Accepted {
        record: Attendance,
        confirmation: Confirmation,
        form: RsvpForm,
    },
    /// Validation failed; nothing was written
    Invalid {
        errors: Vec<FieldError>,
        form: RsvpForm,
    },
    /// The store failed the write; every entered value is handed back
    Failed {
        notice: String,
        error: String,
        form: RsvpForm,
    },
}

impl SubmissionOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmissionOutcome::Accepted { .. })
    }

    /// Form state to show after this attempt
    pub fn form(&self) -> &RsvpForm {
        match self {
            SubmissionOutcome::Accepted { form, .. }
            | SubmissionOutcome::Invalid { form, .. }
            | SubmissionOutcome::Failed { form, .. } => form,
        }
    }
}

/// Validates RSVPs and writes them to the roster
#[derive(Clone)]
pub struct RsvpDesk {
    store: Arc<dyn AttendanceStore>,
    countries: Arc<CountryCatalog>,
}

impl RsvpDesk {
    pub fn new(store: Arc<dyn AttendanceStore>, countries: Arc<CountryCatalog>) -> Self {
        Self { store, countries }
    }

    pub fn countries(&self) -> &CountryCatalog {
        &self.countries
    }

    /// Attendees recorded so far
    pub async fn count(&self) -> usize {
        self.store.len().await
    }

    /// Validate and submit one form
    pub async fn submit(&self, form: RsvpForm) -> SubmissionOutcome {
        let entry = match form.validate(&self.countries) {
            Ok(entry) => entry,
            Err(rejected) => {
                tracing::debug!(
                    fields = ?rejected.errors.iter().map(|e| e.field).collect::<Vec<_>>(),
                    "RSVP form rejected"
                );
                return SubmissionOutcome::Invalid {
                    errors: rejected.errors,
                    form: rejected.form,
                };
            }
        };

        let name = entry.display_name.clone();
        match self.store.submit(entry).await {
            Ok(record) => SubmissionOutcome::Accepted {
                record,
                confirmation: Confirmation::for_name(&name),
                form: RsvpForm::default(),
            },
            Err(e) => {
                tracing::error!(error = %e, "Error adding RSVP to the roster");
                SubmissionOutcome::Failed {
                    notice: SUBMIT_FAILURE_NOTICE.to_string(),
                    error: e.to_string(),
                    form,
                }
            }
        }
    }
}
