//! Roster error types
//!
//! Errors are `Clone` because they travel through the snapshot broadcast
//! channel to every subscriber.

use thiserror::Error;

/// Errors that can occur talking to the attendance store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    /// The store could not be reached or failed mid-operation
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The store refused the write (validation, permissions)
    #[error("Write rejected: {0}")]
    Rejected(String),

    /// The realtime subscription reported a failure
    #[error("Subscription error: {0}")]
    Subscription(String),
}

/// Result type alias for roster operations
pub type RosterResult<T> = Result<T, RosterError>;
