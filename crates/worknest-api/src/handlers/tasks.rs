//! Bulk task operations

use axum::{extract::State, Json};
use serde_json::json;
use worknest_activity_log::EventCategory;
use worknest_domain::{BulkDelete, BulkDeleted, BulkUpdate, Record, Task, TaskPatch};

use crate::{
    error::{ApiError, ApiResult},
    extract::ApiJson,
    middleware::RequestContext,
    state::{AppState, AuditEntry},
};

fn require_ids(ids: &[String]) -> ApiResult<()> {
    if ids.is_empty() {
        return Err(ApiError::BadRequest("ids must not be empty".to_string()));
    }
    Ok(())
}

/// One audit entry per workspace touched by a bulk operation
async fn audit_bulk(state: &AppState, ctx: &RequestContext, action: &str, tasks: &[Task]) {
    let mut by_workspace: Vec<(&str, Vec<&str>)> = Vec::new();
    for task in tasks {
        match by_workspace
            .iter()
            .position(|(ws, _)| *ws == task.workspace_id)
        {
            Some(index) => by_workspace[index].1.push(task.id()),
            None => by_workspace.push((task.workspace_id.as_str(), vec![task.id()])),
        }
    }

    for (workspace_id, ids) in by_workspace {
        let entry = AuditEntry::new(EventCategory::Task, action, format!("workspace/{workspace_id}"))
            .in_workspace(workspace_id)
            .with_details(json!({ "ids": ids, "count": ids.len() }));
        state.audit(ctx, entry).await;
    }
}

/// Apply one patch to every listed task, or to none
pub async fn bulk_update(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiJson(body): ApiJson<BulkUpdate<TaskPatch>>,
) -> ApiResult<Json<Vec<Task>>> {
    require_ids(&body.ids)?;

    let tasks = state.db.update_many::<Task>(&body.ids, body.patch).await?;
    tracing::info!(count = tasks.len(), "Tasks updated in bulk");
    audit_bulk(&state, &ctx, "tasks_bulk_updated", &tasks).await;

    Ok(Json(tasks))
}

/// Delete every listed task, or none
pub async fn bulk_delete(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiJson(body): ApiJson<BulkDelete>,
) -> ApiResult<Json<BulkDeleted>> {
    require_ids(&body.ids)?;

    let removed = state.db.delete_many::<Task>(&body.ids).await?;
    tracing::info!(count = removed.len(), "Tasks deleted in bulk");
    audit_bulk(&state, &ctx, "tasks_bulk_deleted", &removed).await;

    Ok(Json(BulkDeleted {
        deleted: removed.len(),
        ids: removed.into_iter().map(|task| task.id).collect(),
    }))
}
