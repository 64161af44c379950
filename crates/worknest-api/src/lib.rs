//! Worknest RESTful API
//!
//! Axum backend for workspaces, teams, tasks, expenses, communication, templates and
//! the template marketplace. Feature areas are sub-routers mounted under `/api/v1`;
//! handlers work against the in-memory `worknest-store` and write every mutation to
//! the injected activity logger.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ApiResult};
pub use routes::{api_routes, app, API_NAMESPACE};
pub use server::ApiServer;
pub use state::AppState;
