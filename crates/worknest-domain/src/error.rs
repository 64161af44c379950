/// Error types for the domain model
use thiserror::Error;

/// Result type for domain operations
pub type Result<T> = std::result::Result<T, DomainError>;

/// Errors raised while validating drafts, patches and status transitions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Invalid status transition: cannot {action} a workspace that is {from}")]
    InvalidTransition { from: String, action: String },
}

impl DomainError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        DomainError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }
}
