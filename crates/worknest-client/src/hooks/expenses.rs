use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::watch;
use worknest_activity_log::EventCategory;
use worknest_domain::{Expense, ExpenseDraft, ListQuery, Page};
use worknest_http::HttpClientTrait;
use worknest_query::{LocalChange, Mutation, MutationOutcome, MutationState, OptimisticMutation, QueryKey};

use super::HookContext;
use crate::error::Result;
use crate::repository::{RecordRepository, WorkspaceRepository};

/// Expense list of one workspace with optimistic deletes
pub struct ExpenseHooks {
    repo: RecordRepository<Expense>,
    ctx: HookContext,
    workspace_id: String,
    key: QueryKey,
    create: Mutation,
    optimistic: OptimisticMutation<Expense>,
}

impl ExpenseHooks {
    pub fn new(http: Arc<dyn HttpClientTrait>, ctx: HookContext, workspace_id: impl Into<String>) -> Self {
        let workspace_id = workspace_id.into();
        let key = Self::query_key(&workspace_id);
        Self {
            repo: WorkspaceRepository::new(http).expenses(&workspace_id),
            create: Mutation::new(Arc::clone(&ctx.query)).invalidates(key.clone()),
            optimistic: OptimisticMutation::new(
                Arc::clone(&ctx.query),
                key.clone(),
                Arc::clone(&ctx.notifier),
                "Expenses",
            )
            .with_success_message("Expense deleted"),
            ctx,
            workspace_id,
            key,
        }
    }

    pub fn query_key(workspace_id: &str) -> QueryKey {
        QueryKey::from(["expenses"]).with(workspace_id)
    }

    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    pub async fn expenses(&self) -> Result<Page<Expense>> {
        let query = ListQuery::new();
        let page = self
            .ctx
            .query
            .fetch(&self.key, || self.repo.list(&query))
            .await?;
        Ok(page)
    }

    pub async fn create(&self, mut draft: ExpenseDraft) -> Result<Expense> {
        draft.workspace_id = self.workspace_id.clone();
        let result = self.create.run(self.repo.create(&draft)).await;
        self.ctx
            .settle(
                EventCategory::Expense,
                "expense_submitted",
                &self.workspace_id,
                "Expenses",
                "Expense submitted",
                &result,
            )
            .await;
        Ok(result?)
    }

    /// Remove the expense from the cached list at once, restoring it if the server
    /// refuses
    pub async fn delete(&self, expense_id: &str) -> MutationOutcome<Expense> {
        let ids: HashSet<String> = [expense_id.to_string()].into_iter().collect();
        let outcome = self
            .optimistic
            .perform(&ids, LocalChange::Remove, self.repo.delete(expense_id))
            .await;

        self.ctx
            .record_outcome(
                EventCategory::Expense,
                "expense_deleted",
                &self.workspace_id,
                &[expense_id.to_string()],
                &outcome,
            )
            .await;
        outcome
    }

    pub fn mutation_state(&self) -> watch::Receiver<MutationState> {
        self.optimistic.subscribe()
    }
}
