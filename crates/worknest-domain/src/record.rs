/// The `Record` trait implemented by every workspace-scoped entity
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::Result;

/// A flat CRUD record owned by a workspace.
///
/// Creation goes through `Draft` (validated, id and timestamps assigned) and updates
/// through `Patch` (validated, `updated_at` bumped). Both payloads are plain serde
/// structs so they travel unchanged between client and backend.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Create payload
    type Draft: Clone + Serialize + DeserializeOwned + Send + Sync + 'static;
    /// Partial update payload
    type Patch: Clone + Serialize + DeserializeOwned + Send + Sync + 'static;

    /// Singular, lowercase name used in logs and error messages
    const KIND: &'static str;

    fn id(&self) -> &str;

    /// Owning workspace; a workspace returns its own id
    fn workspace_id(&self) -> &str;

    /// Current status as its serialized label
    fn status_label(&self) -> &'static str;

    fn created_at(&self) -> DateTime<Utc>;

    /// Text searched by `ListQuery::search`
    fn search_text(&self) -> String;

    /// Validate a draft and build a new record from it
    fn from_draft(draft: Self::Draft) -> Result<Self>;

    /// Validate and apply a patch in place
    fn apply_patch(&mut self, patch: Self::Patch) -> Result<()>;
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
