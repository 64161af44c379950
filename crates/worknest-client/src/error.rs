//! Client error types

use thiserror::Error;
use worknest_http::HttpError;
use worknest_query::QueryError;

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Http(#[from] HttpError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(String),
}
