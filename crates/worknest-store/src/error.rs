//! Store error types

use thiserror::Error;
use worknest_domain::DomainError;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Store operation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Referenced {kind} does not exist: {id}")]
    MissingReference { kind: &'static str, id: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Policy violation: {0}")]
    PolicyViolation(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl StoreError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn missing(kind: &'static str, id: impl Into<String>) -> Self {
        StoreError::MissingReference {
            kind,
            id: id.into(),
        }
    }
}
