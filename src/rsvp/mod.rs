//! RSVP Form
//!
//! - **form**: field rules and the `RsvpForm` payload
//! - **desk**: `RsvpDesk`, which validates, writes to the roster and reports
//!   the outcome

pub mod desk;
pub mod form;

pub use desk::{Confirmation, RsvpDesk, SubmissionOutcome, SUBMIT_FAILURE_NOTICE};
pub use form::{Field, FieldError, Rejected, RsvpForm};
