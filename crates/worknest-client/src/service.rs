//! Services: repository calls wrapped in `ServiceResult`

use std::fmt;
use std::sync::Arc;

use worknest_activity_log::ActivityEvent;
use worknest_domain::{
    Announcement, BulkDeleted, Expense, HealthStatus, InstallResult, Installation,
    LifecycleAction, ListQuery, Listing, Member, Page, PermissionInfo, Recognition, Record,
    RecordCounts, RoleDescriptor, SecurityPolicy, SecurityPolicyUpdate, Task, TaskPatch,
    Template, Workspace,
};
use worknest_http::HttpClientTrait;

use crate::repository::{
    AuditQuery, MarketplaceRepository, PlatformRepository, RecordRepository, Repositories,
    SecurityRepository, TaskRepository, TemplateRepository, WorkspaceRepository,
};
use crate::result::ServiceResult;

/// Convert a repository result, logging the failure
fn settle<T, E: fmt::Display>(operation: &str, result: Result<T, E>) -> ServiceResult<T> {
    if let Err(e) = &result {
        tracing::error!(operation = %operation, error = %e, "Service call failed");
    }
    result.into()
}

/// CRUD service over any record repository
pub struct RecordService<T: Record> {
    repo: RecordRepository<T>,
}

impl<T: Record> RecordService<T> {
    pub fn new(repo: RecordRepository<T>) -> Self {
        Self { repo }
    }

    pub async fn list(&self, query: &ListQuery) -> ServiceResult<Page<T>> {
        settle(&format!("{}.list", T::KIND), self.repo.list(query).await)
    }

    pub async fn get(&self, id: &str) -> ServiceResult<T> {
        settle(&format!("{}.get", T::KIND), self.repo.get(id).await)
    }

    pub async fn create(&self, draft: &T::Draft) -> ServiceResult<T> {
        settle(&format!("{}.create", T::KIND), self.repo.create(draft).await)
    }

    pub async fn update(&self, id: &str, patch: &T::Patch) -> ServiceResult<T> {
        settle(&format!("{}.update", T::KIND), self.repo.update(id, patch).await)
    }

    pub async fn delete(&self, id: &str) -> ServiceResult<T> {
        settle(&format!("{}.delete", T::KIND), self.repo.delete(id).await)
    }
}

pub struct WorkspaceService {
    pub records: RecordService<Workspace>,
    repo: WorkspaceRepository,
}

impl WorkspaceService {
    pub fn new(repo: WorkspaceRepository) -> Self {
        Self {
            records: RecordService::new(repo.records.clone()),
            repo,
        }
    }

    pub fn expenses(&self, workspace_id: &str) -> RecordService<Expense> {
        RecordService::new(self.repo.expenses(workspace_id))
    }

    pub async fn archive(&self, workspace_id: &str) -> ServiceResult<Workspace> {
        self.transition(workspace_id, LifecycleAction::Archive).await
    }

    pub async fn suspend(&self, workspace_id: &str) -> ServiceResult<Workspace> {
        self.transition(workspace_id, LifecycleAction::Suspend).await
    }

    pub async fn restore(&self, workspace_id: &str) -> ServiceResult<Workspace> {
        self.transition(workspace_id, LifecycleAction::Restore).await
    }

    async fn transition(&self, workspace_id: &str, action: LifecycleAction) -> ServiceResult<Workspace> {
        settle(
            &format!("workspace.{}", action.as_str()),
            self.repo.transition(workspace_id, action).await,
        )
    }

    pub async fn events(&self, workspace_id: &str) -> ServiceResult<Vec<ActivityEvent>> {
        settle("workspace.events", self.repo.events(workspace_id).await)
    }
}

pub struct TaskService {
    pub records: RecordService<Task>,
    repo: TaskRepository,
}

impl TaskService {
    pub fn new(repo: TaskRepository) -> Self {
        Self {
            records: RecordService::new(repo.records.clone()),
            repo,
        }
    }

    pub async fn bulk_update(&self, ids: Vec<String>, patch: TaskPatch) -> ServiceResult<Vec<Task>> {
        settle("task.bulk_update", self.repo.bulk_update(ids, patch).await)
    }

    pub async fn bulk_delete(&self, ids: Vec<String>) -> ServiceResult<BulkDeleted> {
        settle("task.bulk_delete", self.repo.bulk_delete(ids).await)
    }
}

pub struct TemplateService {
    pub records: RecordService<Template>,
    repo: TemplateRepository,
}

impl TemplateService {
    pub fn new(repo: TemplateRepository) -> Self {
        Self {
            records: RecordService::new(repo.records.clone()),
            repo,
        }
    }

    pub async fn instantiate(&self, template_id: &str, workspace_id: &str) -> ServiceResult<Vec<Task>> {
        settle(
            "template.instantiate",
            self.repo.instantiate(template_id, workspace_id).await,
        )
    }
}

pub struct MarketplaceService {
    pub listings: RecordService<Listing>,
    pub installations: RecordService<Installation>,
    repo: MarketplaceRepository,
}

impl MarketplaceService {
    pub fn new(repo: MarketplaceRepository) -> Self {
        Self {
            listings: RecordService::new(repo.listings.clone()),
            installations: RecordService::new(repo.installations.clone()),
            repo,
        }
    }

    pub async fn install(&self, listing_id: &str, workspace_id: &str) -> ServiceResult<InstallResult> {
        settle(
            "marketplace.install",
            self.repo.install(listing_id, workspace_id).await,
        )
    }
}

pub struct SecurityService {
    repo: SecurityRepository,
}

impl SecurityService {
    pub fn new(repo: SecurityRepository) -> Self {
        Self { repo }
    }

    pub async fn policy(&self, workspace_id: &str) -> ServiceResult<SecurityPolicy> {
        settle("security.policy", self.repo.policy(workspace_id).await)
    }

    pub async fn update_policy(
        &self,
        workspace_id: &str,
        update: &SecurityPolicyUpdate,
    ) -> ServiceResult<SecurityPolicy> {
        settle(
            "security.update_policy",
            self.repo.update_policy(workspace_id, update).await,
        )
    }

    pub async fn audit(&self, query: &AuditQuery) -> ServiceResult<Vec<ActivityEvent>> {
        settle("security.audit", self.repo.audit(query).await)
    }
}

pub struct PlatformService {
    repo: PlatformRepository,
}

impl PlatformService {
    pub fn new(repo: PlatformRepository) -> Self {
        Self { repo }
    }

    pub async fn health(&self) -> ServiceResult<HealthStatus> {
        settle("platform.health", self.repo.health().await)
    }

    pub async fn permissions(&self) -> ServiceResult<Vec<PermissionInfo>> {
        settle("platform.permissions", self.repo.permissions().await)
    }

    pub async fn roles(&self) -> ServiceResult<Vec<RoleDescriptor>> {
        settle("platform.roles", self.repo.roles().await)
    }

    pub async fn stats(&self) -> ServiceResult<RecordCounts> {
        settle("platform.stats", self.repo.stats().await)
    }
}

/// One service per feature area
pub struct Services {
    pub workspaces: WorkspaceService,
    pub members: RecordService<Member>,
    pub tasks: TaskService,
    pub announcements: RecordService<Announcement>,
    pub recognitions: RecordService<Recognition>,
    pub templates: TemplateService,
    pub marketplace: MarketplaceService,
    pub security: SecurityService,
    pub platform: PlatformService,
}

impl Services {
    pub fn new(http: Arc<dyn HttpClientTrait>) -> Self {
        let repos = Repositories::new(http);
        Self {
            workspaces: WorkspaceService::new(repos.workspaces),
            members: RecordService::new(repos.members),
            tasks: TaskService::new(repos.tasks),
            announcements: RecordService::new(repos.communication.announcements),
            recognitions: RecordService::new(repos.communication.recognitions),
            templates: TemplateService::new(repos.templates),
            marketplace: MarketplaceService::new(repos.marketplace),
            security: SecurityService::new(repos.security),
            platform: PlatformService::new(repos.platform),
        }
    }
}
