//! JSON transport for the Worknest API
//!
//! Repositories in `worknest-client` hold an `Arc<dyn HttpClientTrait>` and use the
//! typed helpers from `HttpClientExt`. Error bodies of the form
//! `{"error": {"type", "message"}}` come back as `HttpError::Api`, so the server's
//! message reaches the user unchanged.

pub mod client;
pub mod config;
pub mod error;

pub use client::{shared_client, HttpClient, HttpClientExt, HttpClientTrait, HttpRequest};
pub use config::{HttpConfig, ACTOR_HEADER};
pub use error::{HttpError, Result};

pub use reqwest::{Method, StatusCode};
