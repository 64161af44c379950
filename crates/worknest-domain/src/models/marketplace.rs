use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, Result};
use crate::record::{new_id, Record};
use crate::validation;

labelled_enum! {
    ListingStatus {
        Listed => "listed",
        Delisted => "delisted",
    } default Listed
}

labelled_enum! {
    InstallationStatus {
        Active => "active",
        Uninstalled => "uninstalled",
    } default Active
}

/// A template published to the marketplace by its owning workspace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: String,
    /// Publishing workspace
    pub workspace_id: String,
    pub template_id: String,
    pub title: String,
    pub summary: String,
    pub price_cents: i64,
    pub install_count: u64,
    pub status: ListingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingDraft {
    pub workspace_id: String,
    pub template_id: String,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub price_cents: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_cents: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ListingStatus>,
}

fn non_negative_price(price_cents: i64) -> Result<()> {
    if price_cents < 0 {
        return Err(DomainError::validation("price_cents", "cannot be negative"));
    }
    Ok(())
}

impl Record for Listing {
    type Draft = ListingDraft;
    type Patch = ListingPatch;

    const KIND: &'static str = "listing";

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
        format!("{} {}", self.title, self.summary)
    }

    fn from_draft(draft: ListingDraft) -> Result<Self> {
        validation::required("workspace_id", &draft.workspace_id, 64)?;
        validation::required("template_id", &draft.template_id, 64)?;
        validation::required("title", &draft.title, 120)?;
        validation::bounded("summary", &draft.summary, 1000)?;
        non_negative_price(draft.price_cents)?;

        let now = Utc::now();
        Ok(Listing {
            id: new_id(),
            workspace_id: draft.workspace_id,
            template_id: draft.template_id,
            title: draft.title.trim().to_string(),
            summary: draft.summary,
            price_cents: draft.price_cents,
            install_count: 0,
            status: ListingStatus::Listed,
            created_at: now,
            updated_at: now,
        })
    }

    fn apply_patch(&mut self, patch: ListingPatch) -> Result<()> {
        if let Some(ref title) = patch.title {
            validation::required("title", title, 120)?;
        }
        if let Some(ref summary) = patch.summary {
            validation::bounded("summary", summary, 1000)?;
        }
        if let Some(price_cents) = patch.price_cents {
            non_negative_price(price_cents)?;
        }

        if let Some(title) = patch.title {
            self.title = title.trim().to_string();
        }
        if let Some(summary) = patch.summary {
            self.summary = summary;
        }
        if let Some(price_cents) = patch.price_cents {
            self.price_cents = price_cents;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// A marketplace listing installed into a workspace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installation {
    pub id: String,
    pub workspace_id: String,
    pub listing_id: String,
    pub status: InstallationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallationDraft {
    pub workspace_id: String,
    pub listing_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstallationPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<InstallationStatus>,
}

impl Record for Installation {
    type Draft = InstallationDraft;
    type Patch = InstallationPatch;

    const KIND: &'static str = "installation";

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
        self.listing_id.clone()
    }

    fn from_draft(draft: InstallationDraft) -> Result<Self> {
        validation::required("workspace_id", &draft.workspace_id, 64)?;
        validation::required("listing_id", &draft.listing_id, 64)?;

        let now = Utc::now();
        Ok(Installation {
            id: new_id(),
            workspace_id: draft.workspace_id,
            listing_id: draft.listing_id,
            status: InstallationStatus::Active,
            created_at: now,
            updated_at: now,
        })
    }

    fn apply_patch(&mut self, patch: InstallationPatch) -> Result<()> {
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}
