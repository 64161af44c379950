use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, Result};
use crate::record::{new_id, Record};
use crate::validation;

labelled_enum! {
    /// Workspace lifecycle state
    WorkspaceStatus {
        Active => "active",
        Suspended => "suspended",
        Archived => "archived",
    } default Active
}

labelled_enum! {
    /// Explicit lifecycle transitions exposed by the lifecycle router
    LifecycleAction {
        Archive => "archive",
        Suspend => "suspend",
        Restore => "restore",
    } default Restore
}

impl WorkspaceStatus {
    /// Resolve the status reached by applying `action`.
    ///
    /// Only `active -> archived|suspended` and `archived|suspended -> active` are legal.
    pub fn transition(self, action: LifecycleAction) -> Result<WorkspaceStatus> {
        use LifecycleAction::*;
        use WorkspaceStatus::*;

        match (self, action) {
            (Active, Archive) => Ok(Archived),
            (Active, Suspend) => Ok(Suspended),
            (Archived, Restore) | (Suspended, Restore) => Ok(Active),
            (from, action) => Err(DomainError::InvalidTransition {
                from: from.as_str().to_string(),
                action: action.as_str().to_string(),
            }),
        }
    }
}

/// The tenant scoping every other record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: String,
    pub name: String,
    pub description: String,
    pub owner_id: String,
    pub status: WorkspaceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub owner_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkspacePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
}

impl Record for Workspace {
    type Draft = WorkspaceDraft;
    type Patch = WorkspacePatch;

    const KIND: &'static str = "workspace";

    fn id(&self) -> &str {
        &self.id
    }

    fn workspace_id(&self) -> &str {
        &self.id
    }

    fn status_label(&self) -> &'static str {
        self.status.as_str()
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn search_text(&self) -> String {
        format!("{} {}", self.name, self.description)
    }

    fn from_draft(draft: WorkspaceDraft) -> Result<Self> {
        validation::required("name", &draft.name, 100)?;
        validation::bounded("description", &draft.description, 2000)?;
        validation::required("owner_id", &draft.owner_id, 64)?;

        let now = Utc::now();
        Ok(Workspace {
            id: new_id(),
            name: draft.name.trim().to_string(),
            description: draft.description,
            owner_id: draft.owner_id,
            status: WorkspaceStatus::Active,
            created_at: now,
            updated_at: now,
        })
    }

    fn apply_patch(&mut self, patch: WorkspacePatch) -> Result<()> {
        if let Some(ref name) = patch.name {
            validation::required("name", name, 100)?;
        }
        if let Some(ref description) = patch.description {
            validation::bounded("description", description, 2000)?;
        }
        if let Some(ref owner_id) = patch.owner_id {
            validation::required("owner_id", owner_id, 64)?;
        }

        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(owner_id) = patch.owner_id {
            self.owner_id = owner_id;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}
