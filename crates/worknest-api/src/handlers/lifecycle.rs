//! Workspace lifecycle transitions

use axum::{extract::State, Json};
use serde_json::json;
use worknest_activity_log::{ActivityEvent, EventCategory, EventFilter};
use worknest_domain::{LifecycleAction, Workspace};

use crate::{
    error::ApiResult,
    extract::ApiPath,
    middleware::RequestContext,
    state::{AppState, AuditEntry},
};

async fn transition(
    state: AppState,
    ctx: RequestContext,
    workspace_id: String,
    action: LifecycleAction,
) -> ApiResult<Json<Workspace>> {
    let before = state.db.get::<Workspace>(&workspace_id).await?.status;
    let workspace = state.db.transition_workspace(&workspace_id, action).await?;

    tracing::info!(
        workspace_id = %workspace_id,
        action = %action,
        from = %before,
        to = %workspace.status,
        "Workspace transitioned"
    );

    let entry = AuditEntry::new(
        EventCategory::Lifecycle,
        format!("workspace_{}", action.as_str()),
        format!("workspace/{workspace_id}"),
    )
    .in_workspace(workspace_id.as_str())
    .with_details(json!({ "from": before, "to": workspace.status }));
    state.audit(&ctx, entry).await;

    Ok(Json(workspace))
}

pub async fn archive(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(workspace_id): ApiPath<String>,
) -> ApiResult<Json<Workspace>> {
    transition(state, ctx, workspace_id, LifecycleAction::Archive).await
}

pub async fn suspend(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(workspace_id): ApiPath<String>,
) -> ApiResult<Json<Workspace>> {
    transition(state, ctx, workspace_id, LifecycleAction::Suspend).await
}

pub async fn restore(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(workspace_id): ApiPath<String>,
) -> ApiResult<Json<Workspace>> {
    transition(state, ctx, workspace_id, LifecycleAction::Restore).await
}

/// Activity recorded against one workspace, newest first
pub async fn events(
    State(state): State<AppState>,
    ApiPath(workspace_id): ApiPath<String>,
) -> ApiResult<Json<Vec<ActivityEvent>>> {
    state.db.require_workspace(&workspace_id).await?;

    let filter = EventFilter::new().with_workspace_id(workspace_id);
    Ok(Json(state.activity_logger.query_events(&filter).await?))
}
