use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, Result};
use crate::record::{new_id, Record};
use crate::validation;

labelled_enum! {
    ExpenseStatus {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
        Reimbursed => "reimbursed",
    } default Pending
}

/// An expense claim submitted inside a workspace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub workspace_id: String,
    pub submitted_by: String,
    pub amount_cents: i64,
    pub currency: String,
    pub category: String,
    pub description: String,
    pub status: ExpenseStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseDraft {
    /// Filled from the route when the expense is created under a workspace path
    #[serde(default)]
    pub workspace_id: String,
    pub submitted_by: String,
    pub amount_cents: i64,
    pub currency: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpensePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_cents: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ExpenseStatus>,
}

fn positive_amount(amount_cents: i64) -> Result<()> {
    if amount_cents <= 0 {
        return Err(DomainError::validation(
            "amount_cents",
            "must be greater than zero",
        ));
    }
    Ok(())
}

impl Record for Expense {
    type Draft = ExpenseDraft;
    type Patch = ExpensePatch;

    const KIND: &'static str = "expense";

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
        format!("{} {}", self.category, self.description)
    }

    fn from_draft(draft: ExpenseDraft) -> Result<Self> {
        validation::required("workspace_id", &draft.workspace_id, 64)?;
        validation::required("submitted_by", &draft.submitted_by, 64)?;
        positive_amount(draft.amount_cents)?;
        validation::currency("currency", &draft.currency)?;
        validation::required("category", &draft.category, 50)?;
        validation::bounded("description", &draft.description, 1000)?;

        let now = Utc::now();
        Ok(Expense {
            id: new_id(),
            workspace_id: draft.workspace_id,
            submitted_by: draft.submitted_by,
            amount_cents: draft.amount_cents,
            currency: draft.currency,
            category: draft.category.trim().to_string(),
            description: draft.description,
            status: ExpenseStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }

    fn apply_patch(&mut self, patch: ExpensePatch) -> Result<()> {
        if let Some(amount_cents) = patch.amount_cents {
            positive_amount(amount_cents)?;
        }
        if let Some(ref currency) = patch.currency {
            validation::currency("currency", currency)?;
        }
        if let Some(ref category) = patch.category {
            validation::required("category", category, 50)?;
        }
        if let Some(ref description) = patch.description {
            validation::bounded("description", description, 1000)?;
        }

        if let Some(amount_cents) = patch.amount_cents {
            self.amount_cents = amount_cents;
        }
        if let Some(currency) = patch.currency {
            self.currency = currency;
        }
        if let Some(category) = patch.category {
            self.category = category.trim().to_string();
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}
