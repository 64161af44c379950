//! Activity events and the filters used to query them

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{ActivityLogError, ActivityLogResult};

/// Severity of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
        }
    }
}

/// Feature area an event belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Workspace,
    Team,
    Task,
    Expense,
    Communication,
    Template,
    Marketplace,
    Security,
    Lifecycle,
    /// Client-side state changes (optimistic updates, rollbacks)
    Client,
    System,
    Custom(String),
}

impl EventCategory {
    pub fn label(&self) -> &str {
        match self {
            EventCategory::Workspace => "workspace",
            EventCategory::Team => "team",
            EventCategory::Task => "task",
            EventCategory::Expense => "expense",
            EventCategory::Communication => "communication",
            EventCategory::Template => "template",
            EventCategory::Marketplace => "marketplace",
            EventCategory::Security => "security",
            EventCategory::Lifecycle => "lifecycle",
            EventCategory::Client => "client",
            EventCategory::System => "system",
            EventCategory::Custom(name) => name,
        }
    }
}

/// Who did what to which resource, and in which workspace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub category: EventCategory,
    /// e.g. `task_created`, `tasks_deleted`
    pub action: String,
    /// Member id, or `anonymous` for unattributed API calls
    pub actor: String,
    /// `kind/id` of the affected record
    pub resource: String,
    #[serde(default)]
    pub workspace_id: Option<String>,
    /// Correlates the events written while serving one HTTP request
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub details: Value,
}

impl ActivityEvent {
    pub fn new(
        level: LogLevel,
        category: EventCategory,
        action: impl Into<String>,
        actor: impl Into<String>,
        resource: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            level,
            category,
            action: action.into(),
            actor: actor.into(),
            resource: resource.into(),
            workspace_id: None,
            request_id: None,
            details: Value::Null,
        }
    }

    pub fn with_workspace_id(mut self, workspace_id: impl Into<String>) -> Self {
        self.workspace_id = Some(workspace_id.into());
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Action and actor are required; everything else may be blank
    pub fn validate(&self) -> ActivityLogResult<()> {
        if self.action.trim().is_empty() {
            return Err(ActivityLogError::InvalidEvent("action is empty".to_string()));
        }
        if self.actor.trim().is_empty() {
            return Err(ActivityLogError::InvalidEvent("actor is empty".to_string()));
        }
        Ok(())
    }

    /// One-line rendering used when mirroring to `tracing`
    pub fn summary(&self) -> String {
        let scope = self
            .workspace_id
            .as_deref()
            .map(|ws| format!(" in {ws}"))
            .unwrap_or_default();
        format!(
            "{} {} {}{} [{}]",
            self.actor,
            self.action,
            self.resource,
            scope,
            self.category.label()
        )
    }
}

/// `*`-glob over resource names, e.g. `task/*`
#[derive(Debug, Clone)]
enum ResourcePattern {
    Glob(Regex),
    Literal(String),
}

impl ResourcePattern {
    fn new(pattern: &str) -> Self {
        if !pattern.contains('*') {
            return ResourcePattern::Literal(pattern.to_string());
        }
        let anchored = format!(
            "^{}$",
            pattern
                .split('*')
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(".*")
        );
        match Regex::new(&anchored) {
            Ok(regex) => ResourcePattern::Glob(regex),
            Err(_) => ResourcePattern::Literal(pattern.replace('*', "")),
        }
    }

    fn is_match(&self, resource: &str) -> bool {
        match self {
            ResourcePattern::Glob(regex) => regex.is_match(resource),
            ResourcePattern::Literal(text) => resource.contains(text.as_str()),
        }
    }
}

/// Query over stored events. Every criterion left unset matches everything.
#[derive(Debug, Clone)]
pub struct EventFilter {
    pub min_level: Option<LogLevel>,
    /// Empty means any category
    pub categories: Vec<EventCategory>,
    /// Substring of the actor
    pub actor: Option<String>,
    pub workspace_id: Option<String>,
    pub since: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
    resource: Option<ResourcePattern>,
}

impl Default for EventFilter {
    fn default() -> Self {
        Self {
            min_level: Some(LogLevel::Info),
            categories: Vec::new(),
            actor: None,
            workspace_id: None,
            since: None,
            limit: Some(Self::DEFAULT_LIMIT),
            resource: None,
        }
    }
}

impl EventFilter {
    pub const DEFAULT_LIMIT: usize = 100;

    /// Info and above, newest 100
    pub fn new() -> Self {
        Self::default()
    }

    /// Every level, no limit
    pub fn everything() -> Self {
        Self {
            min_level: None,
            limit: None,
            ..Self::default()
        }
    }

    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = Some(level);
        self
    }

    pub fn with_categories(mut self, categories: Vec<EventCategory>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    pub fn with_resource(mut self, pattern: &str) -> Self {
        self.resource = Some(ResourcePattern::new(pattern));
        self
    }

    pub fn with_workspace_id(mut self, workspace_id: impl Into<String>) -> Self {
        self.workspace_id = Some(workspace_id.into());
        self
    }

    pub fn since(mut self, timestamp: DateTime<Utc>) -> Self {
        self.since = Some(timestamp);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, event: &ActivityEvent) -> bool {
        self.min_level.map_or(true, |min| event.level >= min)
            && (self.categories.is_empty() || self.categories.contains(&event.category))
            && self
                .actor
                .as_deref()
                .map_or(true, |actor| event.actor.contains(actor))
            && self
                .workspace_id
                .as_deref()
                .map_or(true, |ws| event.workspace_id.as_deref() == Some(ws))
            && self
                .resource
                .as_ref()
                .map_or(true, |pattern| pattern.is_match(&event.resource))
            && self.since.map_or(true, |since| event.timestamp >= since)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(action: &str, resource: &str) -> ActivityEvent {
        ActivityEvent::new(LogLevel::Info, EventCategory::Task, action, "member-1", resource)
    }

    #[test]
    fn test_validate_requires_action_and_actor() {
        assert!(event(" ", "task/1").validate().is_err());
        let mut e = event("task_created", "task/1");
        assert!(e.validate().is_ok());
        e.actor.clear();
        assert_eq!(
            e.validate(),
            Err(ActivityLogError::InvalidEvent("actor is empty".to_string()))
        );
    }

    #[test]
    fn test_resource_glob() {
        let filter = EventFilter::new().with_resource("task/*");
        assert!(filter.matches(&event("task_created", "task/abc")));
        assert!(!filter.matches(&event("expense_submitted", "expense/abc")));

        let dotted = EventFilter::new().with_resource("task/a.c*");
        assert!(dotted.matches(&event("x", "task/a.c-1")));
        assert!(!dotted.matches(&event("x", "task/abc-1")));
    }

    #[test]
    fn test_workspace_and_category_filters() {
        let filter = EventFilter::new()
            .with_workspace_id("ws-1")
            .with_categories(vec![EventCategory::Task]);
        let scoped = event("task_created", "task/1").with_workspace_id("ws-1");
        let other = event("task_created", "task/2").with_workspace_id("ws-2");
        let mut wrong_category = scoped.clone();
        wrong_category.category = EventCategory::Expense;

        assert!(filter.matches(&scoped));
        assert!(!filter.matches(&other));
        assert!(!filter.matches(&wrong_category));
        assert!(!filter.matches(&event("task_created", "task/3")));
    }

    #[test]
    fn test_level_threshold() {
        let filter = EventFilter::new().with_min_level(LogLevel::Warning);
        let mut e = event("task_created", "task/1");
        assert!(!filter.matches(&e));
        e.level = LogLevel::Error;
        assert!(filter.matches(&e));
        assert!(EventFilter::everything().matches(&ActivityEvent {
            level: LogLevel::Debug,
            ..e
        }));
    }

    #[test]
    fn test_since_excludes_older_events() {
        let mut old = event("task_created", "task/1");
        old.timestamp = Utc::now() - chrono::Duration::hours(2);
        let filter = EventFilter::new().since(Utc::now() - chrono::Duration::hours(1));

        assert!(!filter.matches(&old));
        assert!(filter.matches(&event("task_updated", "task/1")));
    }

    #[test]
    fn test_summary_mentions_workspace() {
        let e = event("task_created", "task/1").with_workspace_id("ws-9");
        assert_eq!(e.summary(), "member-1 task_created task/1 in ws-9 [task]");
    }

    #[test]
    fn test_event_deserializes_without_optional_fields() {
        let json = serde_json::json!({
            "id": Uuid::nil(),
            "timestamp": "2024-05-01T10:00:00Z",
            "level": "warning",
            "category": "client",
            "action": "tasks_deleted",
            "actor": "member-1",
            "resource": "workspace/ws-1",
        });
        let e: ActivityEvent = serde_json::from_value(json).unwrap();
        assert_eq!(e.level, LogLevel::Warning);
        assert_eq!(e.workspace_id, None);
        assert_eq!(e.details, Value::Null);
    }
}
