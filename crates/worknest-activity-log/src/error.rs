//! Error types for the activity log crate

use thiserror::Error;

/// Result type for activity logging operations
pub type ActivityLogResult<T> = Result<T, ActivityLogError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActivityLogError {
    /// The event is missing a required field
    #[error("Invalid activity event: {0}")]
    InvalidEvent(String),

    #[error("Activity store unavailable: {0}")]
    Store(String),
}
