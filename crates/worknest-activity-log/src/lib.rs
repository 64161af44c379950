//! Worknest Activity Logging and Audit Trails
//!
//! Records who did what to which resource, in which workspace. The logger is an
//! injected collaborator: API handlers and client hooks receive an
//! `Arc<ActivityLogger>` and call it explicitly instead of inheriting logging
//! behaviour from the state objects they mutate.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use worknest_activity_log::{ActivityLogger, ActivityEvent, EventCategory, LogLevel};
//!
//! # async fn example() {
//! let logger = ActivityLogger::new();
//!
//! logger.log_activity(
//!     ActivityEvent::new(
//!         LogLevel::Info,
//!         EventCategory::Task,
//!         "task_created",
//!         "member-42",
//!         "task/7f3c",
//!     )
//!     .with_workspace_id("ws-1")
//!     .with_details(serde_json::json!({"title": "Ship it"})),
//! ).await.ok();
//! # }
//! ```

pub mod error;
pub mod events;
pub mod logger;

pub use error::{ActivityLogError, ActivityLogResult};
pub use events::{ActivityEvent, EventCategory, EventFilter, LogLevel};
pub use logger::{ActivityLogger, EventStore, LoggerStats, MemoryEventStore};
