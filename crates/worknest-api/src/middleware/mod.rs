//! Request middleware and extractors

pub mod context;
pub mod logging;

pub use context::{RequestContext, ACTOR_HEADER, REQUEST_ID_HEADER};
pub use logging::logging_middleware;
