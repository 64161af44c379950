/// Data models for the workspace marketplace

/// Declares a status-like enum serialized as snake_case with `as_str`/`parse` helpers
macro_rules! labelled_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $label:literal),+ $(,)? } default $default:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            pub fn parse(s: &str) -> Option<Self> {
                match s {
                    $($label => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

mod communication;
mod expense;
mod marketplace;
mod member;
mod security;
mod task;
mod template;
mod workspace;

pub use communication::{
    Announcement, AnnouncementDraft, AnnouncementPatch, AnnouncementStatus, Recognition,
    RecognitionDraft, RecognitionPatch, RecognitionStatus,
};
pub use expense::{Expense, ExpenseDraft, ExpensePatch, ExpenseStatus};
pub use marketplace::{
    Installation, InstallationDraft, InstallationPatch, InstallationStatus, Listing, ListingDraft,
    ListingPatch, ListingStatus,
};
pub use member::{Member, MemberDraft, MemberPatch, MemberRole, MemberStatus};
pub use security::{SecurityPolicy, SecurityPolicyUpdate};
pub use task::{Task, TaskDraft, TaskPatch, TaskPriority, TaskStatus};
pub use template::{TaskBlueprint, Template, TemplateDraft, TemplatePatch, TemplateStatus};
pub use workspace::{LifecycleAction, Workspace, WorkspaceDraft, WorkspacePatch, WorkspaceStatus};
