//! # Worknest Client
//!
//! Client layer for the Worknest API, in three tiers:
//!
//! - **Repositories**: one per feature area, typed HTTP calls returning
//!   `worknest_http::Result`
//! - **Services**: call a repository, log failures and answer with the uniform
//!   `ServiceResult` wrapper
//! - **Hooks**: cached queries and optimistic mutations for interactive front ends
//!   (`TaskHooks`, `ExpenseHooks`, `MarketplaceSearch`)
//!
//! Audit logging is injected: hooks receive an `Arc<ActivityLogger>` and record one event
//! per mutation outcome.

pub mod config;
pub mod error;
pub mod hooks;
pub mod repository;
pub mod result;
pub mod service;

pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use hooks::{ExpenseHooks, HookContext, MarketplaceSearch, TaskHooks};
pub use repository::{
    query_pairs, AuditQuery, CommunicationRepository, MarketplaceRepository, PlatformRepository,
    RecordRepository, Repositories, SecurityRepository, TaskRepository, TemplateRepository,
    WorkspaceRepository,
};
pub use result::ServiceResult;
pub use service::{
    MarketplaceService, PlatformService, RecordService, SecurityService, Services, TaskService,
    TemplateService, WorkspaceService,
};
