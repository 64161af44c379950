//! Request and response bodies shared by the API and its clients

use serde::{Deserialize, Serialize};

use crate::models::{Installation, Task};

/// Apply one patch to several records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkUpdate<P> {
    pub ids: Vec<String>,
    pub patch: P,
}

/// Delete several records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkDelete {
    pub ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkDeleted {
    pub deleted: usize,
    pub ids: Vec<String>,
}

/// Body of endpoints that act on behalf of a workspace (instantiate, install)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceTarget {
    pub workspace_id: String,
}

/// Result of installing a marketplace listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallResult {
    pub installation: Installation,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

/// Record counts per table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordCounts {
    pub workspaces: usize,
    pub members: usize,
    pub tasks: usize,
    pub expenses: usize,
    pub announcements: usize,
    pub recognitions: usize,
    pub templates: usize,
    pub listings: usize,
    pub installations: usize,
    pub security_policies: usize,
}
