use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::record::{new_id, Record};
use crate::validation;

labelled_enum! {
    TaskStatus {
        Todo => "todo",
        InProgress => "in_progress",
        Review => "review",
        Done => "done",
        Cancelled => "cancelled",
    } default Todo
}

labelled_enum! {
    TaskPriority {
        Low => "low",
        Medium => "medium",
        High => "high",
        Urgent => "urgent",
    } default Medium
}

/// A unit of work tracked inside a workspace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub workspace_id: String,
    pub title: String,
    pub description: String,
    pub assignee_id: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDraft {
    pub workspace_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub assignee_id: Option<String>,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

impl TaskDraft {
    pub fn new(workspace_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            workspace_id: workspace_id.into(),
            title: title.into(),
            description: String::new(),
            assignee_id: None,
            priority: TaskPriority::default(),
            due_date: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

impl TaskPatch {
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Validate without applying; bulk updates check once before touching any task
    pub fn validate(&self) -> Result<()> {
        if let Some(ref title) = self.title {
            validation::required("title", title, 200)?;
        }
        if let Some(ref description) = self.description {
            validation::bounded("description", description, 5000)?;
        }
        Ok(())
    }
}

impl Record for Task {
    type Draft = TaskDraft;
    type Patch = TaskPatch;

    const KIND: &'static str = "task";

    fn id(&self) -> &str {
        &self.id
    }

    fn workspace_id(&self) -> &str {
        &self.workspace_id
    }

    fn status_label(&self) -> &'static str {
        self.status.as_str()
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn search_text(&self) -> String {
        format!("{} {}", self.title, self.description)
    }

    fn from_draft(draft: TaskDraft) -> Result<Self> {
        validation::required("workspace_id", &draft.workspace_id, 64)?;
        validation::required("title", &draft.title, 200)?;
        validation::bounded("description", &draft.description, 5000)?;

        let now = Utc::now();
        Ok(Task {
            id: new_id(),
            workspace_id: draft.workspace_id,
            title: draft.title.trim().to_string(),
            description: draft.description,
            assignee_id: draft.assignee_id,
            status: TaskStatus::Todo,
            priority: draft.priority,
            due_date: draft.due_date,
            created_at: now,
            updated_at: now,
        })
    }

    fn apply_patch(&mut self, patch: TaskPatch) -> Result<()> {
        patch.validate()?;

        if let Some(title) = patch.title {
            self.title = title.trim().to_string();
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(assignee_id) = patch.assignee_id {
            self.assignee_id = Some(assignee_id);
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = Some(due_date);
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_defaults() {
        let task = Task::from_draft(TaskDraft::new("ws-1", "  Write report ")).unwrap();
        assert_eq!(task.title, "Write report");
        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.priority, TaskPriority::Medium);
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
        assert_eq!(TaskStatus::parse("in_progress"), Some(TaskStatus::InProgress));
    }

    #[test]
    fn test_status_patch_only_touches_status() {
        let mut task = Task::from_draft(TaskDraft::new("ws-1", "Ship")).unwrap();
        task.apply_patch(TaskPatch::status(TaskStatus::Done)).unwrap();
        assert_eq!(task.status, TaskStatus::Done);
        assert_eq!(task.title, "Ship");
    }
}
