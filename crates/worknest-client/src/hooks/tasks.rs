use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::watch;
use worknest_activity_log::EventCategory;
use worknest_domain::{BulkDeleted, ListQuery, Page, Task, TaskDraft, TaskPatch, TaskStatus};
use worknest_http::HttpClientTrait;
use worknest_query::{LocalChange, Mutation, MutationOutcome, MutationState, OptimisticMutation, QueryKey};

use super::HookContext;
use crate::error::Result;
use crate::repository::TaskRepository;

/// Task board of one workspace.
///
/// Bulk status changes and bulk deletes are optimistic: the cached page changes at once
/// and is restored if the server rejects the operation.
pub struct TaskHooks {
    repo: TaskRepository,
    ctx: HookContext,
    workspace_id: String,
    key: QueryKey,
    create: Mutation,
    optimistic: OptimisticMutation<Task>,
}

impl TaskHooks {
    pub fn new(http: Arc<dyn HttpClientTrait>, ctx: HookContext, workspace_id: impl Into<String>) -> Self {
        let workspace_id = workspace_id.into();
        let key = Self::query_key(&workspace_id);
        Self {
            repo: TaskRepository::new(http),
            create: Mutation::new(Arc::clone(&ctx.query)).invalidates(key.clone()),
            optimistic: OptimisticMutation::new(
                Arc::clone(&ctx.query),
                key.clone(),
                Arc::clone(&ctx.notifier),
                "Tasks",
            ),
            ctx,
            workspace_id,
            key,
        }
    }

    pub fn query_key(workspace_id: &str) -> QueryKey {
        QueryKey::from(["tasks"]).with(workspace_id)
    }

    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    /// The workspace's tasks, served from cache while fresh
    pub async fn tasks(&self) -> Result<Page<Task>> {
        let query = ListQuery::for_workspace(self.workspace_id.clone());
        let page = self
            .ctx
            .query
            .fetch(&self.key, || self.repo.records.list(&query))
            .await?;
        Ok(page)
    }

    /// Cached page without fetching
    pub async fn cached(&self) -> Result<Option<Page<Task>>> {
        Ok(self.ctx.query.get_data(&self.key).await?)
    }

    pub async fn create(&self, draft: TaskDraft) -> Result<Task> {
        let result = self.create.run(self.repo.records.create(&draft)).await;
        self.ctx
            .settle(
                EventCategory::Task,
                "task_created",
                &self.workspace_id,
                "Tasks",
                "Task created",
                &result,
            )
            .await;
        Ok(result?)
    }

    pub fn create_state(&self) -> watch::Receiver<MutationState> {
        self.create.subscribe()
    }

    /// Optimistically move every task in `ids` to `status`
    pub async fn update_status(&self, ids: &HashSet<String>, status: TaskStatus) -> MutationOutcome<Vec<Task>> {
        let id_list = sorted(ids);
        let outcome = self
            .optimistic
            .perform(
                ids,
                LocalChange::update(move |task: &mut Task| task.status = status),
                self.repo.bulk_update(id_list.clone(), TaskPatch::status(status)),
            )
            .await;

        self.ctx
            .record_outcome(
                EventCategory::Task,
                "tasks_status_changed",
                &self.workspace_id,
                &id_list,
                &outcome,
            )
            .await;
        outcome
    }

    /// Optimistically delete every task in `ids`
    pub async fn delete(&self, ids: &HashSet<String>) -> MutationOutcome<BulkDeleted> {
        let id_list = sorted(ids);
        let outcome = self
            .optimistic
            .perform(ids, LocalChange::Remove, self.repo.bulk_delete(id_list.clone()))
            .await;

        self.ctx
            .record_outcome(
                EventCategory::Task,
                "tasks_deleted",
                &self.workspace_id,
                &id_list,
                &outcome,
            )
            .await;
        outcome
    }

    pub fn mutation_state(&self) -> watch::Receiver<MutationState> {
        self.optimistic.subscribe()
    }
}

fn sorted(ids: &HashSet<String>) -> Vec<String> {
    let mut list: Vec<String> = ids.iter().cloned().collect();
    list.sort();
    list
}
