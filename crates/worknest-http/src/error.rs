//! Errors raised while talking to the Worknest API

use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HttpError>;

#[derive(Debug, Error)]
pub enum HttpError {
    /// The request never produced a response (connect, timeout, TLS)
    #[error("Network request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid proxy configuration: {0}")]
    InvalidProxy(String),

    #[error("Invalid header {name}: {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    Build(String),

    /// Non-2xx response carrying `{"error": {"type", "message"}}`.
    ///
    /// Displays as the server's message alone so it can be shown to users verbatim.
    #[error("{message}")]
    Api {
        status: StatusCode,
        kind: String,
        message: String,
    },

    /// Non-2xx response with any other body
    #[error("HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Failed to encode request body: {0}")]
    Encode(String),

    #[error("Failed to decode response body: {0}")]
    Decode(String),
}

impl HttpError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            HttpError::Api { status, .. } | HttpError::Status { status, .. } => Some(*status),
            HttpError::Transport(e) => e.status(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    /// `validation_error`, `not_found`, `conflict`, ...
    pub fn kind(&self) -> Option<&str> {
        match self {
            HttpError::Api { kind, .. } => Some(kind),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_shows_server_message() {
        let error = HttpError::Api {
            status: StatusCode::NOT_FOUND,
            kind: "not_found".to_string(),
            message: "task not found: t-1".to_string(),
        };

        assert!(error.is_not_found());
        assert_eq!(error.kind(), Some("not_found"));
        assert_eq!(error.to_string(), "task not found: t-1");
    }

    #[test]
    fn test_unstructured_status_has_no_kind() {
        let error = HttpError::Status {
            status: StatusCode::BAD_GATEWAY,
            body: "upstream".to_string(),
        };

        assert_eq!(error.status(), Some(StatusCode::BAD_GATEWAY));
        assert_eq!(error.kind(), None);
        assert_eq!(error.to_string(), "HTTP 502 Bad Gateway: upstream");
    }
}
