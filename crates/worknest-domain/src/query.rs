//! List filtering and pagination shared by the store, the API and the client

use serde::{Deserialize, Serialize};

use crate::record::Record;

/// Filter and paging parameters for list endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<String>,
    /// Status label, e.g. `in_progress`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Case-insensitive substring matched against `Record::search_text`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
}

impl ListQuery {
    pub const DEFAULT_LIMIT: usize = 50;
    pub const MAX_LIMIT: usize = 200;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_workspace(workspace_id: impl Into<String>) -> Self {
        Self {
            workspace_id: Some(workspace_id.into()),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Limit after applying the default and the upper bound
    pub fn effective_limit(&self) -> usize {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }

    pub fn effective_offset(&self) -> usize {
        self.offset.unwrap_or(0)
    }

    /// Check a record against the workspace, status and search filters
    pub fn matches<T: Record>(&self, record: &T) -> bool {
        if let Some(ref workspace_id) = self.workspace_id {
            if record.workspace_id() != workspace_id {
                return false;
            }
        }

        if let Some(ref status) = self.status {
            if record.status_label() != status {
                return false;
            }
        }

        if let Some(ref search) = self.search {
            let needle = search.trim().to_lowercase();
            if !needle.is_empty() && !record.search_text().to_lowercase().contains(&needle) {
                return false;
            }
        }

        true
    }
}

/// One page of a filtered listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Matches before paging
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

impl<T> Page<T> {
    pub fn empty(limit: usize) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            limit,
            offset: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Task, TaskDraft, TaskPatch, TaskStatus};

    fn task(workspace_id: &str, title: &str) -> Task {
        Task::from_draft(TaskDraft::new(workspace_id, title)).unwrap()
    }

    #[test]
    fn test_limit_is_clamped() {
        assert_eq!(ListQuery::new().effective_limit(), 50);
        assert_eq!(ListQuery::new().with_limit(0).effective_limit(), 1);
        assert_eq!(ListQuery::new().with_limit(10_000).effective_limit(), 200);
    }

    #[test]
    fn test_matches_workspace_status_and_search() {
        let mut t = task("ws-1", "Quarterly Report");
        t.apply_patch(TaskPatch::status(TaskStatus::Review)).unwrap();

        assert!(ListQuery::for_workspace("ws-1").matches(&t));
        assert!(!ListQuery::for_workspace("ws-2").matches(&t));
        assert!(ListQuery::new().with_status("review").matches(&t));
        assert!(!ListQuery::new().with_status("todo").matches(&t));
        assert!(ListQuery::new().with_search("report").matches(&t));
        assert!(!ListQuery::new().with_search("invoice").matches(&t));
        assert!(ListQuery::new().with_search("   ").matches(&t));
    }
}
