//! Generic CRUD handlers shared by every record collection
//!
//! Each sub-router mounts these with a concrete record type, e.g.
//! `get(records::list::<Task>)`. Mutations are written to the activity log under the
//! record's event category.

use axum::{extract::State, http::StatusCode, Json};
use serde_json::json;
use worknest_activity_log::EventCategory;
use worknest_domain::{
    Announcement, Expense, Installation, ListQuery, Listing, Member, Page, Recognition, Record,
    Task, Template, Workspace,
};
use worknest_store::Stored;

use crate::{
    error::ApiResult,
    extract::{ApiJson, ApiPath, ApiQuery},
    middleware::RequestContext,
    state::{AppState, AuditEntry},
};

/// A stored record exposed over the API
pub trait Resource: Stored {
    const CATEGORY: EventCategory;

    fn resource(id: &str) -> String {
        format!("{}/{}", Self::KIND, id)
    }

    fn audit_entry(&self, verb: &str) -> AuditEntry {
        AuditEntry::new(
            Self::CATEGORY,
            format!("{}_{}", Self::KIND, verb),
            Self::resource(self.id()),
        )
        .in_workspace(self.workspace_id())
    }
}

impl Resource for Workspace {
    const CATEGORY: EventCategory = EventCategory::Workspace;
}

impl Resource for Member {
    const CATEGORY: EventCategory = EventCategory::Team;
}

impl Resource for Task {
    const CATEGORY: EventCategory = EventCategory::Task;
}

impl Resource for Expense {
    const CATEGORY: EventCategory = EventCategory::Expense;
}

impl Resource for Announcement {
    const CATEGORY: EventCategory = EventCategory::Communication;
}

impl Resource for Recognition {
    const CATEGORY: EventCategory = EventCategory::Communication;
}

impl Resource for Template {
    const CATEGORY: EventCategory = EventCategory::Template;
}

impl Resource for Listing {
    const CATEGORY: EventCategory = EventCategory::Marketplace;
}

impl Resource for Installation {
    const CATEGORY: EventCategory = EventCategory::Marketplace;
}

pub async fn list<T: Resource>(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> ApiResult<Json<Page<T>>> {
    Ok(Json(state.db.list::<T>(&query).await))
}

pub async fn create<T: Resource>(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiJson(draft): ApiJson<T::Draft>,
) -> ApiResult<(StatusCode, Json<T>)> {
    let record = state.db.create::<T>(draft).await?;
    state.audit(&ctx, record.audit_entry("created")).await;

    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn get<T: Resource>(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<Json<T>> {
    Ok(Json(state.db.get::<T>(&id).await?))
}

pub async fn update<T: Resource>(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<String>,
    ApiJson(patch): ApiJson<T::Patch>,
) -> ApiResult<Json<T>> {
    let details = json!({ "patch": patch });
    let record = state.db.update::<T>(&id, patch).await?;
    state
        .audit(&ctx, record.audit_entry("updated").with_details(details))
        .await;

    Ok(Json(record))
}

pub async fn delete<T: Resource>(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<Json<T>> {
    let record = state.db.delete::<T>(&id).await?;
    state.audit(&ctx, record.audit_entry("deleted")).await;

    Ok(Json(record))
}
