//! Template instantiation

use axum::{extract::State, http::StatusCode, Json};
use serde_json::json;
use worknest_activity_log::EventCategory;
use worknest_domain::{Task, WorkspaceTarget};

use crate::{
    error::ApiResult,
    extract::{ApiJson, ApiPath},
    middleware::RequestContext,
    state::{AppState, AuditEntry},
};

/// Create one task per blueprint of the template in the target workspace
pub async fn instantiate(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(template_id): ApiPath<String>,
    ApiJson(target): ApiJson<WorkspaceTarget>,
) -> ApiResult<(StatusCode, Json<Vec<Task>>)> {
    let tasks = state
        .db
        .instantiate_template(&template_id, &target.workspace_id)
        .await?;

    let entry = AuditEntry::new(
        EventCategory::Template,
        "template_instantiated",
        format!("template/{template_id}"),
    )
    .in_workspace(target.workspace_id.as_str())
    .with_details(json!({ "task_count": tasks.len() }));
    state.audit(&ctx, entry).await;

    Ok((StatusCode::CREATED, Json(tasks)))
}
