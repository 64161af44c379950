use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::record::{new_id, Record};
use crate::validation;

labelled_enum! {
    /// Role of a member inside a workspace
    MemberRole {
        Owner => "owner",
        Admin => "admin",
        Member => "member",
        Guest => "guest",
    } default Member
}

labelled_enum! {
    MemberStatus {
        Invited => "invited",
        Active => "active",
        Removed => "removed",
    } default Invited
}

/// A person belonging to a workspace team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub workspace_id: String,
    pub name: String,
    pub email: String,
    pub role: MemberRole,
    pub status: MemberStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberDraft {
    pub workspace_id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: MemberRole,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemberPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<MemberRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<MemberStatus>,
}

impl Record for Member {
    type Draft = MemberDraft;
    type Patch = MemberPatch;

    const KIND: &'static str = "member";

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
        format!("{} {} {}", self.name, self.email, self.role)
    }

    fn from_draft(draft: MemberDraft) -> Result<Self> {
        validation::required("workspace_id", &draft.workspace_id, 64)?;
        validation::required("name", &draft.name, 100)?;
        validation::email("email", &draft.email)?;

        let now = Utc::now();
        Ok(Member {
            id: new_id(),
            workspace_id: draft.workspace_id,
            name: draft.name.trim().to_string(),
            email: draft.email.to_lowercase(),
            role: draft.role,
            status: MemberStatus::Invited,
            created_at: now,
            updated_at: now,
        })
    }

    fn apply_patch(&mut self, patch: MemberPatch) -> Result<()> {
        if let Some(ref name) = patch.name {
            validation::required("name", name, 100)?;
        }
        if let Some(ref email) = patch.email {
            validation::email("email", email)?;
        }

        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(email) = patch.email {
            self.email = email.to_lowercase();
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}
