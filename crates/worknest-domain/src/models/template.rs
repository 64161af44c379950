use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::task::{TaskDraft, TaskPriority};
use crate::record::{new_id, Record};
use crate::validation;

labelled_enum! {
    TemplateStatus {
        Draft => "draft",
        Published => "published",
        Archived => "archived",
    } default Draft
}

/// One task a template creates when instantiated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskBlueprint {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: TaskPriority,
}

impl TaskBlueprint {
    /// Draft for a concrete task in `workspace_id`
    pub fn to_draft(&self, workspace_id: &str) -> TaskDraft {
        TaskDraft {
            workspace_id: workspace_id.to_string(),
            title: self.title.clone(),
            description: self.description.clone(),
            assignee_id: None,
            priority: self.priority,
            due_date: None,
        }
    }
}

/// A reusable workspace setup: a named bundle of task blueprints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub workspace_id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub tasks: Vec<TaskBlueprint>,
    pub status: TemplateStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateDraft {
    pub workspace_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tasks: Vec<TaskBlueprint>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplatePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<TaskBlueprint>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TemplateStatus>,
}

fn validate_blueprints(tasks: &[TaskBlueprint]) -> Result<()> {
    for blueprint in tasks {
        validation::required("tasks.title", &blueprint.title, 200)?;
        validation::bounded("tasks.description", &blueprint.description, 5000)?;
    }
    Ok(())
}

impl Record for Template {
    type Draft = TemplateDraft;
    type Patch = TemplatePatch;

    const KIND: &'static str = "template";

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
        format!("{} {} {}", self.name, self.category, self.description)
    }

    fn from_draft(draft: TemplateDraft) -> Result<Self> {
        validation::required("workspace_id", &draft.workspace_id, 64)?;
        validation::required("name", &draft.name, 100)?;
        validation::bounded("description", &draft.description, 2000)?;
        validation::bounded("category", &draft.category, 50)?;
        validate_blueprints(&draft.tasks)?;

        let now = Utc::now();
        Ok(Template {
            id: new_id(),
            workspace_id: draft.workspace_id,
            name: draft.name.trim().to_string(),
            description: draft.description,
            category: draft.category,
            tasks: draft.tasks,
            status: TemplateStatus::Draft,
            created_at: now,
            updated_at: now,
        })
    }

    fn apply_patch(&mut self, patch: TemplatePatch) -> Result<()> {
        if let Some(ref name) = patch.name {
            validation::required("name", name, 100)?;
        }
        if let Some(ref description) = patch.description {
            validation::bounded("description", description, 2000)?;
        }
        if let Some(ref category) = patch.category {
            validation::bounded("category", category, 50)?;
        }
        if let Some(ref tasks) = patch.tasks {
            validate_blueprints(tasks)?;
        }

        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(tasks) = patch.tasks {
            self.tasks = tasks;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}
