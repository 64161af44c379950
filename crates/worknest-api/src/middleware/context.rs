//! Per-request caller identity

use std::convert::Infallible;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

pub const ACTOR_HEADER: &str = "x-worknest-actor";
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Actor recorded when a request does not name one
pub const ANONYMOUS: &str = "anonymous";

/// Request id assigned by the logging middleware
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Who is calling, and which request this is
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub actor: String,
    pub request_id: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let actor = parts
            .headers
            .get(ACTOR_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|actor| !actor.is_empty())
            .unwrap_or(ANONYMOUS)
            .to_string();

        let request_id = parts
            .extensions
            .get::<RequestId>()
            .map(|id| id.0.clone())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        Ok(RequestContext { actor, request_id })
    }
}
