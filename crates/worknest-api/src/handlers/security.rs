//! Security policies and the audit trail

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::json;
use worknest_activity_log::{ActivityEvent, EventCategory, EventFilter};
use worknest_domain::{SecurityPolicy, SecurityPolicyUpdate};

use crate::{
    error::ApiResult,
    extract::{ApiJson, ApiPath, ApiQuery},
    middleware::RequestContext,
    state::{AppState, AuditEntry},
};

const MAX_AUDIT_EVENTS: usize = 500;

/// Filters accepted by `GET /security/audit`
#[derive(Debug, Default, Deserialize)]
pub struct AuditParams {
    pub workspace_id: Option<String>,
    pub actor: Option<String>,
    pub limit: Option<usize>,
}

impl AuditParams {
    fn filter(self) -> EventFilter {
        let mut filter = EventFilter::new();
        if let Some(workspace_id) = self.workspace_id {
            filter = filter.with_workspace_id(workspace_id);
        }
        if let Some(actor) = self.actor {
            filter = filter.with_actor(actor);
        }
        if let Some(limit) = self.limit {
            filter = filter.with_limit(limit.clamp(1, MAX_AUDIT_EVENTS));
        }
        filter
    }
}

pub async fn get_policy(
    State(state): State<AppState>,
    ApiPath(workspace_id): ApiPath<String>,
) -> ApiResult<Json<SecurityPolicy>> {
    Ok(Json(state.db.security_policy(&workspace_id).await?))
}

pub async fn update_policy(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(workspace_id): ApiPath<String>,
    ApiJson(update): ApiJson<SecurityPolicyUpdate>,
) -> ApiResult<Json<SecurityPolicy>> {
    let details = json!({ "update": update });
    let policy = state
        .db
        .update_security_policy(&workspace_id, update)
        .await?;

    let entry = AuditEntry::new(
        EventCategory::Security,
        "security_policy_updated",
        format!("security_policy/{workspace_id}"),
    )
    .in_workspace(workspace_id.as_str())
    .with_details(details);
    state.audit(&ctx, entry).await;

    Ok(Json(policy))
}

/// Newest-first activity events
pub async fn audit_trail(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<AuditParams>,
) -> ApiResult<Json<Vec<ActivityEvent>>> {
    let events = state.activity_logger.query_events(&params.filter()).await?;
    Ok(Json(events))
}
