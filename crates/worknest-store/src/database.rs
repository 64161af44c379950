//! The database: one table per record type plus referential rules

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use worknest_domain::{
    Announcement, Expense, Installation, InstallationDraft, InstallationStatus, LifecycleAction,
    ListQuery, Listing, ListingStatus, Member, MemberDraft, MemberRole, Page, Recognition, Record,
    RecordCounts, SecurityPolicy, SecurityPolicyUpdate, Task, TaskDraft, TaskPriority, Template,
    Workspace, WorkspaceDraft,
};

use crate::error::{Result, StoreError};
use crate::table::Table;

/// A record type with a table in the database
#[async_trait]
pub trait Stored: Record {
    fn table(db: &Database) -> &Table<Self>;

    /// Check the references a new record points at
    async fn check_references(&self, db: &Database) -> Result<()> {
        db.require_workspace(self.workspace_id()).await
    }

    /// Check a patched record before it replaces the stored one
    async fn check_update(&self, _db: &Database) -> Result<()> {
        Ok(())
    }

    /// Refuse removal while other records still point at this one
    async fn check_delete(&self, _db: &Database) -> Result<()> {
        Ok(())
    }

    /// Side effects after the record has been removed
    async fn after_delete(&self, _db: &Database) {}
}

/// In-memory stand-in for the relational database
#[derive(Default)]
pub struct Database {
    pub workspaces: Table<Workspace>,
    pub members: Table<Member>,
    pub tasks: Table<Task>,
    pub expenses: Table<Expense>,
    pub announcements: Table<Announcement>,
    pub recognitions: Table<Recognition>,
    pub templates: Table<Template>,
    pub listings: Table<Listing>,
    pub installations: Table<Installation>,
    policies: RwLock<HashMap<String, SecurityPolicy>>,
    /// Held shared from a create's reference checks through its insert, and exclusively
    /// by deletes, so no record is inserted against a parent that is being removed.
    references: RwLock<()>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn require_workspace(&self, workspace_id: &str) -> Result<()> {
        if self.workspaces.contains(workspace_id).await {
            Ok(())
        } else {
            Err(StoreError::missing(Workspace::KIND, workspace_id))
        }
    }

    /// Validate a draft, check its references and insert it
    pub async fn create<T: Stored>(&self, draft: T::Draft) -> Result<T> {
        let record = T::from_draft(draft)?;
        let _references = self.references.read().await;
        self.insert_checked(record).await
    }

    /// Caller holds `references` shared
    async fn insert_checked<T: Stored>(&self, record: T) -> Result<T> {
        record.check_references(self).await?;
        let record = T::table(self).insert(record).await?;

        tracing::debug!(kind = T::KIND, id = %record.id(), "Record created");
        Ok(record)
    }

    pub async fn get<T: Stored>(&self, id: &str) -> Result<T> {
        T::table(self)
            .get(id)
            .await
            .ok_or_else(|| StoreError::not_found(T::KIND, id))
    }

    pub async fn list<T: Stored>(&self, query: &ListQuery) -> Page<T> {
        T::table(self).list(query).await
    }

    pub async fn update<T: Stored>(&self, id: &str, patch: T::Patch) -> Result<T> {
        self.check_patched::<T>(id, &patch).await?;
        T::table(self).update(id, patch).await
    }

    pub async fn update_many<T: Stored>(&self, ids: &[String], patch: T::Patch) -> Result<Vec<T>> {
        for id in ids {
            self.check_patched::<T>(id, &patch).await?;
        }
        T::table(self).update_many(ids, patch).await
    }

    /// Run `check_update` on what the record would become; unknown ids are left to the table
    async fn check_patched<T: Stored>(&self, id: &str, patch: &T::Patch) -> Result<()> {
        if let Some(mut staged) = T::table(self).get(id).await {
            staged.apply_patch(patch.clone())?;
            staged.check_update(self).await?;
        }
        Ok(())
    }

    pub async fn delete<T: Stored>(&self, id: &str) -> Result<T> {
        let _references = self.references.write().await;
        if let Some(current) = T::table(self).get(id).await {
            current.check_delete(self).await?;
        }
        let record = T::table(self).remove(id).await?;
        record.after_delete(self).await;

        tracing::debug!(kind = T::KIND, id = %id, "Record deleted");
        Ok(record)
    }

    pub async fn delete_many<T: Stored>(&self, ids: &[String]) -> Result<Vec<T>> {
        let _references = self.references.write().await;
        for id in ids {
            if let Some(current) = T::table(self).get(id).await {
                current.check_delete(self).await?;
            }
        }
        let removed = T::table(self).remove_many(ids).await?;
        for record in &removed {
            record.after_delete(self).await;
        }
        Ok(removed)
    }

    /// Apply a lifecycle transition to a workspace
    pub async fn transition_workspace(&self, id: &str, action: LifecycleAction) -> Result<Workspace> {
        self.workspaces
            .modify(id, |workspace| {
                workspace.status = workspace.status.transition(action)?;
                workspace.updated_at = Utc::now();
                Ok(())
            })
            .await
    }

    /// Stored policy, or the default one when the workspace never set any
    pub async fn security_policy(&self, workspace_id: &str) -> Result<SecurityPolicy> {
        self.require_workspace(workspace_id).await?;
        let policies = self.policies.read().await;
        Ok(policies
            .get(workspace_id)
            .cloned()
            .unwrap_or_else(|| SecurityPolicy::default_for(workspace_id)))
    }

    pub async fn update_security_policy(
        &self,
        workspace_id: &str,
        update: SecurityPolicyUpdate,
    ) -> Result<SecurityPolicy> {
        self.require_workspace(workspace_id).await?;
        let mut policies = self.policies.write().await;
        let mut policy = policies
            .get(workspace_id)
            .cloned()
            .unwrap_or_else(|| SecurityPolicy::default_for(workspace_id));
        policy.apply(update)?;
        policies.insert(workspace_id.to_string(), policy.clone());
        Ok(policy)
    }

    /// Create one task per blueprint of `template_id` inside `workspace_id`
    pub async fn instantiate_template(&self, template_id: &str, workspace_id: &str) -> Result<Vec<Task>> {
        let _references = self.references.read().await;
        let template: Template = self.get(template_id).await?;
        self.require_workspace(workspace_id).await?;

        let tasks = stage_tasks(&template, workspace_id)?;
        self.insert_tasks(tasks, &template, workspace_id).await
    }

    /// Caller holds `references` shared and has validated every task
    async fn insert_tasks(
        &self,
        tasks: Vec<Task>,
        template: &Template,
        workspace_id: &str,
    ) -> Result<Vec<Task>> {
        let mut created = Vec::with_capacity(tasks.len());
        for task in tasks {
            created.push(self.tasks.insert(task).await?);
        }

        tracing::info!(
            template_id = %template.id,
            workspace_id = %workspace_id,
            task_count = created.len(),
            "Template instantiated"
        );
        Ok(created)
    }

    /// Install a listed marketplace entry into a workspace.
    ///
    /// The workspace, the listing and its template are resolved and the tasks validated
    /// before anything is written; then the installation and tasks are inserted and the
    /// listing's install count bumped, all while deletes are held off.
    pub async fn install_listing(
        &self,
        listing_id: &str,
        workspace_id: &str,
    ) -> Result<(Installation, Vec<Task>)> {
        let _references = self.references.read().await;

        let installation = Installation::from_draft(InstallationDraft {
            workspace_id: workspace_id.to_string(),
            listing_id: listing_id.to_string(),
        })?;
        installation.check_references(self).await?;

        let listing: Listing = self.get(listing_id).await?;
        let template = self
            .templates
            .get(&listing.template_id)
            .await
            .ok_or_else(|| StoreError::missing(Template::KIND, listing.template_id.as_str()))?;
        let tasks = stage_tasks(&template, workspace_id)?;

        let installation = self.installations.insert(installation).await?;
        let tasks = self.insert_tasks(tasks, &template, workspace_id).await?;
        self.listings
            .modify(listing_id, |listing| {
                listing.install_count += 1;
                Ok(())
            })
            .await?;

        Ok((installation, tasks))
    }

    /// Mark an installation uninstalled; a second call is a conflict
    pub async fn uninstall(&self, installation_id: &str) -> Result<Installation> {
        self.installations
            .modify(installation_id, |installation| {
                if installation.status == InstallationStatus::Uninstalled {
                    return Err(StoreError::Conflict(format!(
                        "installation {} is already uninstalled",
                        installation.id
                    )));
                }
                installation.status = InstallationStatus::Uninstalled;
                installation.updated_at = Utc::now();
                Ok(())
            })
            .await
    }

    pub async fn stats(&self) -> RecordCounts {
        RecordCounts {
            workspaces: self.workspaces.len().await,
            members: self.members.len().await,
            tasks: self.tasks.len().await,
            expenses: self.expenses.len().await,
            announcements: self.announcements.len().await,
            recognitions: self.recognitions.len().await,
            templates: self.templates.len().await,
            listings: self.listings.len().await,
            installations: self.installations.len().await,
            security_policies: self.policies.read().await.len(),
        }
    }

    /// Populate a demo workspace with a small team and a few tasks
    pub async fn seed_demo(&self) -> Result<Workspace> {
        let workspace = self
            .create::<Workspace>(WorkspaceDraft {
                name: "Demo Studio".to_string(),
                description: "Sample workspace created at startup".to_string(),
                owner_id: "demo-owner".to_string(),
            })
            .await?;

        for (name, email, role) in [
            ("Ada Lovelace", "ada@worknest.dev", MemberRole::Owner),
            ("Grace Hopper", "grace@worknest.dev", MemberRole::Admin),
            ("Alan Turing", "alan@worknest.dev", MemberRole::Member),
        ] {
            self.create::<Member>(MemberDraft {
                workspace_id: workspace.id.clone(),
                name: name.to_string(),
                email: email.to_string(),
                role,
            })
            .await?;
        }

        for (title, priority) in [
            ("Set up billing", TaskPriority::High),
            ("Invite the team", TaskPriority::Medium),
            ("Publish first template", TaskPriority::Low),
        ] {
            let mut draft = TaskDraft::new(workspace.id.clone(), title);
            draft.priority = priority;
            self.create::<Task>(draft).await?;
        }

        tracing::info!(workspace_id = %workspace.id, "Demo data seeded");
        Ok(workspace)
    }
}

fn stage_tasks(template: &Template, workspace_id: &str) -> Result<Vec<Task>> {
    let tasks = template
        .tasks
        .iter()
        .map(|blueprint| Task::from_draft(blueprint.to_draft(workspace_id)))
        .collect::<worknest_domain::Result<Vec<_>>>()?;
    Ok(tasks)
}

#[async_trait]
impl Stored for Workspace {
    fn table(db: &Database) -> &Table<Self> {
        &db.workspaces
    }

    async fn check_references(&self, _db: &Database) -> Result<()> {
        Ok(())
    }

    async fn after_delete(&self, db: &Database) {
        let id = self.id.as_str();
        let removed = db.members.remove_workspace(id).await
            + db.tasks.remove_workspace(id).await
            + db.expenses.remove_workspace(id).await
            + db.announcements.remove_workspace(id).await
            + db.recognitions.remove_workspace(id).await
            + db.templates.remove_workspace(id).await
            + db.listings.remove_workspace(id).await
            + db.installations.remove_workspace(id).await;
        db.policies.write().await.remove(id);

        tracing::info!(workspace_id = %id, removed, "Workspace deleted with owned records");
    }
}

#[async_trait]
impl Stored for Member {
    fn table(db: &Database) -> &Table<Self> {
        &db.members
    }

    async fn check_references(&self, db: &Database) -> Result<()> {
        self.check_update(db).await
    }

    /// The email must satisfy the workspace policy on every write, not only on invite
    async fn check_update(&self, db: &Database) -> Result<()> {
        let policy = db.security_policy(&self.workspace_id).await?;
        if !policy.allows_email(&self.email) {
            return Err(StoreError::PolicyViolation(format!(
                "{} is not in an allowed domain for workspace {}",
                self.email, self.workspace_id
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl Stored for Task {
    fn table(db: &Database) -> &Table<Self> {
        &db.tasks
    }
}

#[async_trait]
impl Stored for Expense {
    fn table(db: &Database) -> &Table<Self> {
        &db.expenses
    }
}

#[async_trait]
impl Stored for Announcement {
    fn table(db: &Database) -> &Table<Self> {
        &db.announcements
    }
}

#[async_trait]
impl Stored for Recognition {
    fn table(db: &Database) -> &Table<Self> {
        &db.recognitions
    }

    async fn check_references(&self, db: &Database) -> Result<()> {
        db.require_workspace(&self.workspace_id).await?;
        for member_id in [&self.from_member_id, &self.to_member_id] {
            match db.members.get(member_id).await {
                Some(member) if member.workspace_id == self.workspace_id => {}
                _ => return Err(StoreError::missing(Member::KIND, member_id.as_str())),
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Stored for Template {
    fn table(db: &Database) -> &Table<Self> {
        &db.templates
    }

    async fn check_delete(&self, db: &Database) -> Result<()> {
        let listed = db
            .listings
            .count_where(|listing| listing.template_id == self.id)
            .await;
        if listed > 0 {
            return Err(StoreError::Conflict(format!(
                "template {} is still used by {listed} marketplace listing(s)",
                self.id
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl Stored for Listing {
    fn table(db: &Database) -> &Table<Self> {
        &db.listings
    }

    async fn check_references(&self, db: &Database) -> Result<()> {
        db.require_workspace(&self.workspace_id).await?;
        match db.templates.get(&self.template_id).await {
            Some(template) if template.workspace_id == self.workspace_id => Ok(()),
            Some(_) => Err(StoreError::Conflict(format!(
                "template {} does not belong to workspace {}",
                self.template_id, self.workspace_id
            ))),
            None => Err(StoreError::missing(Template::KIND, self.template_id.as_str())),
        }
    }
}

#[async_trait]
impl Stored for Installation {
    fn table(db: &Database) -> &Table<Self> {
        &db.installations
    }

    async fn check_references(&self, db: &Database) -> Result<()> {
        db.require_workspace(&self.workspace_id).await?;
        match db.listings.get(&self.listing_id).await {
            Some(listing) if listing.status == ListingStatus::Listed => Ok(()),
            Some(_) => Err(StoreError::Conflict(format!(
                "listing {} is not available for installation",
                self.listing_id
            ))),
            None => Err(StoreError::missing(Listing::KIND, self.listing_id.as_str())),
        }
    }
}
