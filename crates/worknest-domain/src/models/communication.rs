use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, Result};
use crate::record::{new_id, Record};
use crate::validation;

labelled_enum! {
    AnnouncementStatus {
        Draft => "draft",
        Published => "published",
        Archived => "archived",
    } default Draft
}

labelled_enum! {
    RecognitionStatus {
        Published => "published",
        Hidden => "hidden",
    } default Published
}

/// A workspace-wide announcement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
    pub id: String,
    pub workspace_id: String,
    pub author_id: String,
    pub title: String,
    pub body: String,
    pub status: AnnouncementStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnouncementDraft {
    pub workspace_id: String,
    pub author_id: String,
    pub title: String,
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnnouncementPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AnnouncementStatus>,
}

impl Record for Announcement {
    type Draft = AnnouncementDraft;
    type Patch = AnnouncementPatch;

    const KIND: &'static str = "announcement";

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
        format!("{} {}", self.title, self.body)
    }

    fn from_draft(draft: AnnouncementDraft) -> Result<Self> {
        validation::required("workspace_id", &draft.workspace_id, 64)?;
        validation::required("author_id", &draft.author_id, 64)?;
        validation::required("title", &draft.title, 200)?;
        validation::bounded("body", &draft.body, 10_000)?;

        let now = Utc::now();
        Ok(Announcement {
            id: new_id(),
            workspace_id: draft.workspace_id,
            author_id: draft.author_id,
            title: draft.title.trim().to_string(),
            body: draft.body,
            status: AnnouncementStatus::Draft,
            created_at: now,
            updated_at: now,
        })
    }

    fn apply_patch(&mut self, patch: AnnouncementPatch) -> Result<()> {
        if let Some(ref title) = patch.title {
            validation::required("title", title, 200)?;
        }
        if let Some(ref body) = patch.body {
            validation::bounded("body", body, 10_000)?;
        }

        if let Some(title) = patch.title {
            self.title = title.trim().to_string();
        }
        if let Some(body) = patch.body {
            self.body = body;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Peer recognition ("kudos") from one member to another
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recognition {
    pub id: String,
    pub workspace_id: String,
    pub from_member_id: String,
    pub to_member_id: String,
    pub message: String,
    pub badge: String,
    pub status: RecognitionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_badge() -> String {
    "kudos".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognitionDraft {
    pub workspace_id: String,
    pub from_member_id: String,
    pub to_member_id: String,
    pub message: String,
    #[serde(default = "default_badge")]
    pub badge: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecognitionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RecognitionStatus>,
}

impl Record for Recognition {
    type Draft = RecognitionDraft;
    type Patch = RecognitionPatch;

    const KIND: &'static str = "recognition";

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
        format!("{} {}", self.badge, self.message)
    }

    fn from_draft(draft: RecognitionDraft) -> Result<Self> {
        validation::required("workspace_id", &draft.workspace_id, 64)?;
        validation::required("from_member_id", &draft.from_member_id, 64)?;
        validation::required("to_member_id", &draft.to_member_id, 64)?;
        if draft.from_member_id == draft.to_member_id {
            return Err(DomainError::validation(
                "to_member_id",
                "members cannot recognize themselves",
            ));
        }
        validation::required("message", &draft.message, 500)?;
        validation::required("badge", &draft.badge, 32)?;

        let now = Utc::now();
        Ok(Recognition {
            id: new_id(),
            workspace_id: draft.workspace_id,
            from_member_id: draft.from_member_id,
            to_member_id: draft.to_member_id,
            message: draft.message.trim().to_string(),
            badge: draft.badge,
            status: RecognitionStatus::Published,
            created_at: now,
            updated_at: now,
        })
    }

    fn apply_patch(&mut self, patch: RecognitionPatch) -> Result<()> {
        if let Some(ref message) = patch.message {
            validation::required("message", message, 500)?;
        }
        if let Some(ref badge) = patch.badge {
            validation::required("badge", badge, 32)?;
        }

        if let Some(message) = patch.message {
            self.message = message.trim().to_string();
        }
        if let Some(badge) = patch.badge {
            self.badge = badge;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}
