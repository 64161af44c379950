//! Hooks: cached queries and optimistic mutations for interactive front ends

mod expenses;
mod marketplace;
mod tasks;

use std::sync::Arc;

use serde_json::json;
use worknest_activity_log::{ActivityEvent, ActivityLogger, EventCategory, LogLevel};
use worknest_query::{MutationOutcome, Notification, Notifier, QueryClient};

pub use expenses::ExpenseHooks;
pub use marketplace::MarketplaceSearch;
pub use tasks::TaskHooks;

/// Collaborators shared by every hook
#[derive(Clone)]
pub struct HookContext {
    pub query: Arc<QueryClient>,
    pub activity_logger: Arc<ActivityLogger>,
    pub notifier: Arc<dyn Notifier>,
    /// Recorded as the actor of client-side activity events
    pub actor: String,
}

impl HookContext {
    pub fn new(
        query: Arc<QueryClient>,
        activity_logger: Arc<ActivityLogger>,
        notifier: Arc<dyn Notifier>,
        actor: impl Into<String>,
    ) -> Self {
        Self {
            query,
            activity_logger,
            notifier,
            actor: actor.into(),
        }
    }

    /// Record the outcome of a mutation in the activity log
    pub(crate) async fn record_outcome<R>(
        &self,
        category: EventCategory,
        action: &str,
        workspace_id: &str,
        ids: &[String],
        outcome: &MutationOutcome<R>,
    ) {
        let (level, details) = match outcome {
            MutationOutcome::Committed(_) => (LogLevel::Info, json!({ "ids": ids })),
            MutationOutcome::RolledBack(error) => (
                LogLevel::Warning,
                json!({ "ids": ids, "error": error, "rolled_back": true }),
            ),
        };
        let event = ActivityEvent::new(
            level,
            category,
            action.to_string(),
            self.actor.clone(),
            format!("workspace/{workspace_id}"),
        )
        .with_workspace_id(workspace_id.to_string())
        .with_details(details);

        self.activity_logger.record(event).await;
    }

    /// Notify and record a non-optimistic mutation result.
    ///
    /// `action` goes to the activity log only; users see `success_message`.
    pub(crate) async fn settle<T, E: std::fmt::Display>(
        &self,
        category: EventCategory,
        action: &str,
        workspace_id: &str,
        title: &str,
        success_message: &str,
        result: &Result<T, E>,
    ) {
        match result {
            Ok(_) => {
                self.notifier.notify(Notification::success(title, success_message));
                self.record_outcome::<()>(
                    category,
                    action,
                    workspace_id,
                    &[],
                    &MutationOutcome::Committed(()),
                )
                .await;
            }
            Err(e) => {
                tracing::error!(action = %action, error = %e, "Mutation failed");
                self.notifier.notify(Notification::error(title, e.to_string()));
                self.record_outcome::<()>(
                    category,
                    action,
                    workspace_id,
                    &[],
                    &MutationOutcome::RolledBack(e.to_string()),
                )
                .await;
            }
        }
    }
}
