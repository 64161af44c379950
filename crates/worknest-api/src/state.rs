//! Application state for the API server

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use worknest_activity_log::{ActivityEvent, ActivityLogger, EventCategory, LogLevel};
use worknest_store::Database;

use crate::middleware::RequestContext;

/// Application state shared across all API handlers
#[derive(Clone)]
pub struct AppState {
    /// Record store
    pub db: Arc<Database>,
    /// Audit trail written by every mutating handler
    pub activity_logger: Arc<ActivityLogger>,
    /// Server start time for uptime calculation
    pub start_time: Instant,
}

impl AppState {
    pub fn new(db: Arc<Database>, activity_logger: Arc<ActivityLogger>) -> Self {
        Self {
            db,
            activity_logger,
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Record an audit event for a mutation performed by `ctx`
    pub async fn audit(&self, ctx: &RequestContext, entry: AuditEntry) {
        let mut event = ActivityEvent::new(
            LogLevel::Info,
            entry.category,
            entry.action,
            ctx.actor.clone(),
            entry.resource,
        )
        .with_request_id(ctx.request_id.clone())
        .with_details(entry.details);

        if let Some(workspace_id) = entry.workspace_id {
            event = event.with_workspace_id(workspace_id);
        }

        self.activity_logger.record(event).await;
    }
}

/// One audit record before it is attributed to a request
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub category: EventCategory,
    pub action: String,
    pub resource: String,
    pub workspace_id: Option<String>,
    pub details: Value,
}

impl AuditEntry {
    pub fn new(
        category: EventCategory,
        action: impl Into<String>,
        resource: impl Into<String>,
    ) -> Self {
        Self {
            category,
            action: action.into(),
            resource: resource.into(),
            workspace_id: None,
            details: Value::Null,
        }
    }

    pub fn in_workspace(mut self, workspace_id: impl Into<String>) -> Self {
        self.workspace_id = Some(workspace_id.into());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }
}
