//! Query-related error types

use thiserror::Error;

/// Query cache errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    /// The fetcher or remote mutation failed; carries its message
    #[error("{0}")]
    Remote(String),

    #[error("Serialization error for {key}: {message}")]
    Serialization { key: String, message: String },

    #[error("Cached data for {key} has an unexpected shape: {message}")]
    Deserialization { key: String, message: String },
}

pub type Result<T> = std::result::Result<T, QueryError>;
