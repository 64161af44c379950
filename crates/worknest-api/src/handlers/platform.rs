//! Health check and static catalogue endpoints

use axum::{extract::State, Json};
use worknest_domain::{HealthStatus, PermissionInfo, RecordCounts, RoleDescriptor};

use crate::state::AppState;

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
    })
}

pub async fn permissions() -> Json<Vec<PermissionInfo>> {
    Json(PermissionInfo::catalogue())
}

pub async fn roles() -> Json<Vec<RoleDescriptor>> {
    Json(RoleDescriptor::catalogue())
}

/// Record counts per table
pub async fn stats(State(state): State<AppState>) -> Json<RecordCounts> {
    Json(state.db.stats().await)
}
