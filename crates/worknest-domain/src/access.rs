/// Static role and permission catalogue served by `/permissions` and `/roles`
use serde::{Deserialize, Serialize};

use crate::models::MemberRole;

/// Actions a member may be granted inside a workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    WorkspaceManage,
    WorkspaceView,
    TeamManage,
    TaskWrite,
    TaskView,
    ExpenseSubmit,
    ExpenseApprove,
    CommunicationPost,
    TemplateManage,
    MarketplacePublish,
    MarketplaceInstall,
    SecurityManage,
}

impl Permission {
    pub const ALL: &'static [Permission] = &[
        Permission::WorkspaceManage,
        Permission::WorkspaceView,
        Permission::TeamManage,
        Permission::TaskWrite,
        Permission::TaskView,
        Permission::ExpenseSubmit,
        Permission::ExpenseApprove,
        Permission::CommunicationPost,
        Permission::TemplateManage,
        Permission::MarketplacePublish,
        Permission::MarketplaceInstall,
        Permission::SecurityManage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::WorkspaceManage => "workspace_manage",
            Permission::WorkspaceView => "workspace_view",
            Permission::TeamManage => "team_manage",
            Permission::TaskWrite => "task_write",
            Permission::TaskView => "task_view",
            Permission::ExpenseSubmit => "expense_submit",
            Permission::ExpenseApprove => "expense_approve",
            Permission::CommunicationPost => "communication_post",
            Permission::TemplateManage => "template_manage",
            Permission::MarketplacePublish => "marketplace_publish",
            Permission::MarketplaceInstall => "marketplace_install",
            Permission::SecurityManage => "security_manage",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Permission::WorkspaceManage => "Rename, archive and delete the workspace",
            Permission::WorkspaceView => "Read workspace details",
            Permission::TeamManage => "Invite, update and remove members",
            Permission::TaskWrite => "Create, update and delete tasks",
            Permission::TaskView => "Read tasks",
            Permission::ExpenseSubmit => "Submit expense claims",
            Permission::ExpenseApprove => "Approve, reject and reimburse expenses",
            Permission::CommunicationPost => "Post announcements and recognitions",
            Permission::TemplateManage => "Create and instantiate templates",
            Permission::MarketplacePublish => "Publish templates to the marketplace",
            Permission::MarketplaceInstall => "Install marketplace listings",
            Permission::SecurityManage => "Change security policy and read the audit log",
        }
    }
}

impl MemberRole {
    /// Permissions granted to the role
    pub fn permissions(&self) -> Vec<Permission> {
        use Permission::*;

        match self {
            MemberRole::Owner => Permission::ALL.to_vec(),
            MemberRole::Admin => vec![
                WorkspaceView,
                TeamManage,
                TaskWrite,
                TaskView,
                ExpenseSubmit,
                ExpenseApprove,
                CommunicationPost,
                TemplateManage,
                MarketplacePublish,
                MarketplaceInstall,
            ],
            MemberRole::Member => vec![
                WorkspaceView,
                TaskWrite,
                TaskView,
                ExpenseSubmit,
                CommunicationPost,
            ],
            MemberRole::Guest => vec![WorkspaceView, TaskView],
        }
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }
}

/// Serializable view of a role and what it grants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleDescriptor {
    pub role: MemberRole,
    pub permissions: Vec<Permission>,
}

impl RoleDescriptor {
    pub fn catalogue() -> Vec<RoleDescriptor> {
        MemberRole::ALL
            .iter()
            .map(|role| RoleDescriptor {
                role: *role,
                permissions: role.permissions(),
            })
            .collect()
    }
}

/// Entry of the static permission catalogue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionInfo {
    pub permission: Permission,
    pub description: String,
}

impl PermissionInfo {
    pub fn catalogue() -> Vec<PermissionInfo> {
        Permission::ALL
            .iter()
            .map(|p| PermissionInfo {
                permission: *p,
                description: p.description().to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_has_everything() {
        for permission in Permission::ALL {
            assert!(MemberRole::Owner.has_permission(*permission));
        }
    }

    #[test]
    fn test_guest_is_read_only() {
        assert!(MemberRole::Guest.has_permission(Permission::TaskView));
        assert!(!MemberRole::Guest.has_permission(Permission::TaskWrite));
    }

    #[test]
    fn test_catalogue_covers_every_role() {
        assert_eq!(RoleDescriptor::catalogue().len(), MemberRole::ALL.len());
    }
}
