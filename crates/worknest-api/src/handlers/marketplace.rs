//! Marketplace install and uninstall

use axum::{extract::State, http::StatusCode, Json};
use serde_json::json;
use worknest_domain::{InstallResult, Installation, WorkspaceTarget};

use super::records::Resource;
use crate::{
    error::ApiResult,
    extract::{ApiJson, ApiPath},
    middleware::RequestContext,
    state::AppState,
};

/// Install a listing: creates the installation and the template's tasks
pub async fn install(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(listing_id): ApiPath<String>,
    ApiJson(target): ApiJson<WorkspaceTarget>,
) -> ApiResult<(StatusCode, Json<InstallResult>)> {
    let (installation, tasks) = state
        .db
        .install_listing(&listing_id, &target.workspace_id)
        .await?;

    state
        .audit(
            &ctx,
            installation.audit_entry("created").with_details(json!({
                "listing_id": listing_id,
                "task_count": tasks.len(),
            })),
        )
        .await;

    Ok((StatusCode::CREATED, Json(InstallResult { installation, tasks })))
}

/// Mark an installation uninstalled; the record is kept for history
pub async fn uninstall(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(installation_id): ApiPath<String>,
) -> ApiResult<Json<Installation>> {
    let installation = state.db.uninstall(&installation_id).await?;
    state
        .audit(&ctx, installation.audit_entry("uninstalled"))
        .await;

    Ok(Json(installation))
}
