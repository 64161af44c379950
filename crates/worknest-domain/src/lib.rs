/// Worknest domain model
///
/// Flat, per-request records shared by the API backend, the in-memory store and the
/// client layer. Every workspace-scoped record carries an identifier, the owning
/// workspace, a status and UTC timestamps; creation goes through a validated draft and
/// updates through a validated patch.
///
/// The module is consumed by:
/// - worknest-store: tables keyed by record id, filtered with `ListQuery`
/// - worknest-api: request/response bodies for every sub-router
/// - worknest-client: typed repositories and optimistic cache updates

pub mod access;
pub mod error;
pub mod models;
pub mod query;
pub mod record;
pub mod validation;
pub mod wire;

pub use access::{Permission, PermissionInfo, RoleDescriptor};
pub use error::{DomainError, Result};
pub use models::{
    Announcement, AnnouncementDraft, AnnouncementPatch, AnnouncementStatus, Expense, ExpenseDraft,
    ExpensePatch, ExpenseStatus, Installation, InstallationDraft, InstallationPatch,
    InstallationStatus, LifecycleAction, Listing, ListingDraft, ListingPatch, ListingStatus,
    Member, MemberDraft, MemberPatch, MemberRole, MemberStatus, Recognition, RecognitionDraft,
    RecognitionPatch, RecognitionStatus, SecurityPolicy, SecurityPolicyUpdate, Task,
    TaskBlueprint, TaskDraft, TaskPatch, TaskPriority, TaskStatus, Template, TemplateDraft,
    TemplatePatch, TemplateStatus, Workspace, WorkspaceDraft, WorkspacePatch, WorkspaceStatus,
};
pub use query::{ListQuery, Page};
pub use record::Record;
pub use wire::{
    BulkDelete, BulkDeleted, BulkUpdate, HealthStatus, InstallResult, RecordCounts, WorkspaceTarget,
};
