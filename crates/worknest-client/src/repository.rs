//! Repositories: typed calls to one feature area of the API

use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::json;
use worknest_activity_log::ActivityEvent;
use worknest_domain::{
    Announcement, BulkDelete, BulkDeleted, BulkUpdate, Expense, HealthStatus, InstallResult,
    Installation, LifecycleAction, ListQuery, Listing, Member, Page, PermissionInfo, Recognition,
    RecordCounts, Record, RoleDescriptor, SecurityPolicy, SecurityPolicyUpdate, Task, TaskPatch,
    Template, Workspace, WorkspaceTarget,
};
use worknest_http::{HttpClientExt, HttpClientTrait, Result};

/// Query string pairs for a list request
pub fn query_pairs(query: &ListQuery) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    if let Some(workspace_id) = &query.workspace_id {
        pairs.push(("workspace_id".to_string(), workspace_id.clone()));
    }
    if let Some(status) = &query.status {
        pairs.push(("status".to_string(), status.clone()));
    }
    if let Some(search) = &query.search {
        pairs.push(("search".to_string(), search.clone()));
    }
    if let Some(limit) = query.limit {
        pairs.push(("limit".to_string(), limit.to_string()));
    }
    if let Some(offset) = query.offset {
        pairs.push(("offset".to_string(), offset.to_string()));
    }
    pairs
}

/// CRUD calls against one collection path, e.g. `/tasks`
pub struct RecordRepository<T: Record> {
    http: Arc<dyn HttpClientTrait>,
    path: String,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> Clone for RecordRepository<T> {
    fn clone(&self) -> Self {
        Self {
            http: Arc::clone(&self.http),
            path: self.path.clone(),
            _record: PhantomData,
        }
    }
}

impl<T: Record> RecordRepository<T> {
    pub fn new(http: Arc<dyn HttpClientTrait>, path: impl Into<String>) -> Self {
        Self {
            http,
            path: path.into(),
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    fn item(&self, id: &str) -> String {
        format!("{}/{}", self.path, id)
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Page<T>> {
        self.http.get_json(&self.path, query_pairs(query)).await
    }

    pub async fn get(&self, id: &str) -> Result<T> {
        self.http.get_json(&self.item(id), Vec::new()).await
    }

    pub async fn create(&self, draft: &T::Draft) -> Result<T> {
        self.http.post_json(&self.path, draft).await
    }

    pub async fn update(&self, id: &str, patch: &T::Patch) -> Result<T> {
        self.http.patch_json(&self.item(id), patch).await
    }

    /// Returns the record as it was removed
    pub async fn delete(&self, id: &str) -> Result<T> {
        self.http.delete_json(&self.item(id)).await
    }
}

pub struct WorkspaceRepository {
    pub records: RecordRepository<Workspace>,
    http: Arc<dyn HttpClientTrait>,
}

impl WorkspaceRepository {
    pub fn new(http: Arc<dyn HttpClientTrait>) -> Self {
        Self {
            records: RecordRepository::new(Arc::clone(&http), "/workspaces"),
            http,
        }
    }

    /// Expenses of one workspace
    pub fn expenses(&self, workspace_id: &str) -> RecordRepository<Expense> {
        RecordRepository::new(
            Arc::clone(&self.http),
            format!("/workspaces/{workspace_id}/expenses"),
        )
    }

    pub async fn transition(&self, workspace_id: &str, action: LifecycleAction) -> Result<Workspace> {
        self.http
            .post_json(
                &format!("/lifecycle/workspaces/{workspace_id}/{}", action.as_str()),
                &json!({}),
            )
            .await
    }

    pub async fn events(&self, workspace_id: &str) -> Result<Vec<ActivityEvent>> {
        self.http
            .get_json(
                &format!("/lifecycle/workspaces/{workspace_id}/events"),
                Vec::new(),
            )
            .await
    }
}

pub struct TaskRepository {
    pub records: RecordRepository<Task>,
    http: Arc<dyn HttpClientTrait>,
}

impl TaskRepository {
    pub fn new(http: Arc<dyn HttpClientTrait>) -> Self {
        Self {
            records: RecordRepository::new(Arc::clone(&http), "/tasks"),
            http,
        }
    }

    /// Patch every task in `ids`; the server applies all or none
    pub async fn bulk_update(&self, ids: Vec<String>, patch: TaskPatch) -> Result<Vec<Task>> {
        self.http
            .patch_json("/tasks", &BulkUpdate { ids, patch })
            .await
    }

    pub async fn bulk_delete(&self, ids: Vec<String>) -> Result<BulkDeleted> {
        self.http
            .delete_with_body("/tasks", &BulkDelete { ids })
            .await
    }
}

pub struct CommunicationRepository {
    pub announcements: RecordRepository<Announcement>,
    pub recognitions: RecordRepository<Recognition>,
}

impl CommunicationRepository {
    pub fn new(http: Arc<dyn HttpClientTrait>) -> Self {
        Self {
            announcements: RecordRepository::new(
                Arc::clone(&http),
                "/communication/announcements",
            ),
            recognitions: RecordRepository::new(http, "/communication/recognitions"),
        }
    }
}

pub struct TemplateRepository {
    pub records: RecordRepository<Template>,
    http: Arc<dyn HttpClientTrait>,
}

impl TemplateRepository {
    pub fn new(http: Arc<dyn HttpClientTrait>) -> Self {
        Self {
            records: RecordRepository::new(Arc::clone(&http), "/templates"),
            http,
        }
    }

    /// Create the template's tasks in `workspace_id`
    pub async fn instantiate(&self, template_id: &str, workspace_id: &str) -> Result<Vec<Task>> {
        self.http
            .post_json(
                &format!("/templates/{template_id}/instantiate"),
                &WorkspaceTarget {
                    workspace_id: workspace_id.to_string(),
                },
            )
            .await
    }
}

pub struct MarketplaceRepository {
    pub listings: RecordRepository<Listing>,
    pub installations: RecordRepository<Installation>,
    http: Arc<dyn HttpClientTrait>,
}

impl MarketplaceRepository {
    pub fn new(http: Arc<dyn HttpClientTrait>) -> Self {
        Self {
            listings: RecordRepository::new(Arc::clone(&http), "/marketplace/listings"),
            installations: RecordRepository::new(Arc::clone(&http), "/marketplace/installations"),
            http,
        }
    }

    pub async fn install(&self, listing_id: &str, workspace_id: &str) -> Result<InstallResult> {
        self.http
            .post_json(
                &format!("/marketplace/listings/{listing_id}/install"),
                &WorkspaceTarget {
                    workspace_id: workspace_id.to_string(),
                },
            )
            .await
    }
}

/// Filters for the audit trail endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditQuery {
    pub workspace_id: Option<String>,
    pub actor: Option<String>,
    pub limit: Option<usize>,
}

impl AuditQuery {
    fn pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(workspace_id) = &self.workspace_id {
            pairs.push(("workspace_id".to_string(), workspace_id.clone()));
        }
        if let Some(actor) = &self.actor {
            pairs.push(("actor".to_string(), actor.clone()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        pairs
    }
}

pub struct SecurityRepository {
    http: Arc<dyn HttpClientTrait>,
}

impl SecurityRepository {
    pub fn new(http: Arc<dyn HttpClientTrait>) -> Self {
        Self { http }
    }

    pub async fn policy(&self, workspace_id: &str) -> Result<SecurityPolicy> {
        self.http
            .get_json(&format!("/security/policies/{workspace_id}"), Vec::new())
            .await
    }

    pub async fn update_policy(
        &self,
        workspace_id: &str,
        update: &SecurityPolicyUpdate,
    ) -> Result<SecurityPolicy> {
        self.http
            .put_json(&format!("/security/policies/{workspace_id}"), update)
            .await
    }

    pub async fn audit(&self, query: &AuditQuery) -> Result<Vec<ActivityEvent>> {
        self.http.get_json("/security/audit", query.pairs()).await
    }
}

/// Static and near-static endpoints
pub struct PlatformRepository {
    http: Arc<dyn HttpClientTrait>,
}

impl PlatformRepository {
    pub fn new(http: Arc<dyn HttpClientTrait>) -> Self {
        Self { http }
    }

    pub async fn health(&self) -> Result<HealthStatus> {
        self.http.get_json("/health", Vec::new()).await
    }

    pub async fn permissions(&self) -> Result<Vec<PermissionInfo>> {
        self.http.get_json("/permissions", Vec::new()).await
    }

    pub async fn roles(&self) -> Result<Vec<RoleDescriptor>> {
        self.http.get_json("/roles", Vec::new()).await
    }

    pub async fn stats(&self) -> Result<RecordCounts> {
        self.http.get_json("/stats", Vec::new()).await
    }
}

/// Every repository over one shared HTTP client
pub struct Repositories {
    pub workspaces: WorkspaceRepository,
    pub members: RecordRepository<Member>,
    pub tasks: TaskRepository,
    pub communication: CommunicationRepository,
    pub templates: TemplateRepository,
    pub marketplace: MarketplaceRepository,
    pub security: SecurityRepository,
    pub platform: PlatformRepository,
}

impl Repositories {
    pub fn new(http: Arc<dyn HttpClientTrait>) -> Self {
        Self {
            workspaces: WorkspaceRepository::new(Arc::clone(&http)),
            members: RecordRepository::new(Arc::clone(&http), "/team/members"),
            tasks: TaskRepository::new(Arc::clone(&http)),
            communication: CommunicationRepository::new(Arc::clone(&http)),
            templates: TemplateRepository::new(Arc::clone(&http)),
            marketplace: MarketplaceRepository::new(Arc::clone(&http)),
            security: SecurityRepository::new(Arc::clone(&http)),
            platform: PlatformRepository::new(http),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_pairs_skip_unset_fields() {
        let query = ListQuery::for_workspace("ws-1")
            .with_search("launch")
            .with_limit(10);

        assert_eq!(
            query_pairs(&query),
            vec![
                ("workspace_id".to_string(), "ws-1".to_string()),
                ("search".to_string(), "launch".to_string()),
                ("limit".to_string(), "10".to_string()),
            ]
        );
        assert!(query_pairs(&ListQuery::new()).is_empty());
    }
}
