//! Router tests driven through `tower::ServiceExt::oneshot`
//!
//! Covers namespace delegation, the error contract, bulk task semantics, lifecycle
//! transitions, workspace-scoped expenses and the marketplace install flow.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use worknest_activity_log::ActivityLogger;
use worknest_api::{app, middleware::ACTOR_HEADER, routes, AppState};
use worknest_domain::{
    SecurityPolicyUpdate, Task, TaskBlueprint, TaskDraft, TaskPriority, Template, TemplateDraft,
    Workspace, WorkspaceDraft,
};
use worknest_store::Database;

fn test_state() -> AppState {
    AppState::new(Arc::new(Database::new()), Arc::new(ActivityLogger::new()))
}

async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(ACTOR_HEADER, "tester");
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Path of a sub-router request once mounted under the namespace
fn namespaced(prefix: &str, inner: &str) -> String {
    if inner == "/" {
        format!("/api/v1{prefix}")
    } else if let Some(query) = inner.strip_prefix("/?") {
        format!("/api/v1{prefix}?{query}")
    } else {
        format!("/api/v1{prefix}{inner}")
    }
}

fn error_type(body: &Value) -> &str {
    body["error"]["type"].as_str().unwrap_or_default()
}

async fn workspace(state: &AppState, name: &str) -> Workspace {
    state
        .db
        .create::<Workspace>(WorkspaceDraft {
            name: name.to_string(),
            description: String::new(),
            owner_id: "owner-1".to_string(),
        })
        .await
        .unwrap()
}

async fn task(state: &AppState, workspace_id: &str, title: &str) -> Task {
    state
        .db
        .create::<Task>(TaskDraft::new(workspace_id, title))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_health_and_static_endpoints() {
    let state = test_state();
    workspace(&state, "Acme").await;
    let router = app(state);

    let (status, health) = send(&router, Method::GET, "/api/v1/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["version"], env!("CARGO_PKG_VERSION"));

    let (status, permissions) = send(&router, Method::GET, "/api/v1/permissions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!permissions.as_array().unwrap().is_empty());

    let (_, roles) = send(&router, Method::GET, "/api/v1/roles", None).await;
    assert!(roles
        .as_array()
        .unwrap()
        .iter()
        .any(|role| role["role"] == "owner"));

    let (_, stats) = send(&router, Method::GET, "/api/v1/stats", None).await;
    assert_eq!(stats["workspaces"], 1);
    assert_eq!(stats["tasks"], 0);
}

#[tokio::test]
async fn test_namespace_returns_sub_router_response_unchanged() {
    let state = test_state();
    let ws = state.db.seed_demo().await.unwrap();
    state
        .db
        .update_security_policy(
            &ws.id,
            SecurityPolicyUpdate {
                require_mfa: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let full = app(state.clone());

    let paths = [
        ("/workspaces", "/".to_string()),
        ("/team", format!("/members?workspace_id={}", ws.id)),
        ("/tasks", format!("/?workspace_id={}&limit=2", ws.id)),
        ("/communication", "/announcements".to_string()),
        ("/templates", "/".to_string()),
        ("/marketplace", "/listings".to_string()),
        ("/security", format!("/policies/{}", ws.id)),
        ("/lifecycle", "/workspaces/missing/events".to_string()),
    ];

    let sub_routers = routes::sub_routers();
    assert_eq!(sub_routers.len(), paths.len());

    for (prefix, sub_router) in sub_routers {
        let (_, inner) = paths
            .iter()
            .find(|(p, _)| *p == prefix)
            .unwrap_or_else(|| panic!("no request for {prefix}"));
        let direct = sub_router.with_state(state.clone());

        let through_namespace = namespaced(prefix, inner);

        let delegated = send(&full, Method::GET, &through_namespace, None).await;
        let expected = send(&direct, Method::GET, inner, None).await;
        assert_eq!(delegated, expected, "response differs for {prefix}");
    }
}

#[tokio::test]
async fn test_task_crud_records_activity() {
    let state = test_state();
    let ws = workspace(&state, "Acme").await;
    let router = app(state);

    let (status, created) = send(
        &router,
        Method::POST,
        "/api/v1/tasks",
        Some(json!({ "workspace_id": ws.id, "title": "Write docs", "priority": "high" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["status"], "todo");

    let (status, updated) = send(
        &router,
        Method::PATCH,
        &format!("/api/v1/tasks/{id}"),
        Some(json!({ "status": "in_progress" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "in_progress");

    let (_, page) = send(
        &router,
        Method::GET,
        &format!("/api/v1/tasks?workspace_id={}&status=in_progress", ws.id),
        None,
    )
    .await;
    assert_eq!(page["total"], 1);

    let (status, _) = send(&router, Method::DELETE, &format!("/api/v1/tasks/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&router, Method::GET, &format!("/api/v1/tasks/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, events) = send(
        &router,
        Method::GET,
        &format!("/api/v1/security/audit?workspace_id={}&actor=tester", ws.id),
        None,
    )
    .await;
    let actions: Vec<&str> = events
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|event| event["action"].as_str())
        .collect();
    assert_eq!(actions, vec!["task_deleted", "task_updated", "task_created"]);
}

#[tokio::test]
async fn test_bulk_operations_are_all_or_nothing() {
    let state = test_state();
    let ws = workspace(&state, "Acme").await;
    let a = task(&state, &ws.id, "a").await;
    let b = task(&state, &ws.id, "b").await;
    let router = app(state.clone());

    let (status, body) = send(
        &router,
        Method::PATCH,
        "/api/v1/tasks",
        Some(json!({ "ids": [a.id, b.id, "missing"], "patch": { "status": "done" } })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_type(&body), "not_found");
    for id in [&a.id, &b.id] {
        let stored = state.db.get::<Task>(id).await.unwrap();
        assert_eq!(stored.status.as_str(), "todo");
    }

    let (status, updated) = send(
        &router,
        Method::PATCH,
        "/api/v1/tasks",
        Some(json!({ "ids": [a.id, b.id], "patch": { "status": "done" } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated.as_array().unwrap().len(), 2);

    let (status, _) = send(
        &router,
        Method::DELETE,
        "/api/v1/tasks",
        Some(json!({ "ids": [a.id, "missing"] })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(state.db.stats().await.tasks, 2);

    let (status, deleted) = send(
        &router,
        Method::DELETE,
        "/api/v1/tasks",
        Some(json!({ "ids": [a.id, b.id] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["deleted"], 2);
    assert_eq!(state.db.stats().await.tasks, 0);
}

#[tokio::test]
async fn test_error_contract() {
    let state = test_state();
    let ws = workspace(&state, "Acme").await;
    let router = app(state);

    let (status, body) = send(
        &router,
        Method::POST,
        "/api/v1/tasks",
        Some(json!({ "workspace_id": ws.id, "title": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_type(&body), "validation_error");
    assert!(body["error"]["message"].as_str().unwrap().contains("title"));

    let (status, body) = send(
        &router,
        Method::POST,
        "/api/v1/tasks",
        Some(json!({ "workspace_id": "nowhere", "title": "Orphan" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_type(&body), "missing_reference");

    let (status, body) = send(&router, Method::GET, "/api/v1/templates/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_type(&body), "not_found");

    let (status, body) = send(
        &router,
        Method::PATCH,
        "/api/v1/tasks",
        Some(json!({ "ids": [], "patch": {} })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_type(&body), "bad_request");

    let (status, body) = send(
        &router,
        Method::POST,
        "/api/v1/workspaces",
        Some(json!({ "description": "no name" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_type(&body), "bad_request");

    let (status, body) = send(
        &router,
        Method::GET,
        "/api/v1/tasks?limit=many",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_type(&body), "bad_request");
}

#[tokio::test]
async fn test_lifecycle_transitions_and_conflicts() {
    let state = test_state();
    let ws = workspace(&state, "Acme").await;
    let router = app(state);
    let base = format!("/api/v1/lifecycle/workspaces/{}", ws.id);

    let (status, archived) = send(&router, Method::POST, &format!("{base}/archive"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(archived["status"], "archived");

    let (status, body) = send(&router, Method::POST, &format!("{base}/suspend"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_type(&body), "invalid_transition");

    let (status, restored) = send(&router, Method::POST, &format!("{base}/restore"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(restored["status"], "active");

    let (status, body) = send(&router, Method::POST, &format!("{base}/restore"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_type(&body), "invalid_transition");

    let (_, events) = send(&router, Method::GET, &format!("{base}/events"), None).await;
    let actions: Vec<&str> = events
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|event| event["action"].as_str())
        .collect();
    assert_eq!(actions, vec!["workspace_restore", "workspace_archive"]);

    let (status, _) = send(
        &router,
        Method::POST,
        "/api/v1/lifecycle/workspaces/missing/archive",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_expenses_are_scoped_to_their_workspace() {
    let state = test_state();
    let a = workspace(&state, "A").await;
    let b = workspace(&state, "B").await;
    let router = app(state);

    let (status, expense) = send(
        &router,
        Method::POST,
        &format!("/api/v1/workspaces/{}/expenses", a.id),
        Some(json!({
            "workspace_id": b.id,
            "submitted_by": "member-1",
            "amount_cents": 4200,
            "currency": "USD",
            "category": "travel",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(expense["workspace_id"], a.id.as_str());
    let id = expense["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &router,
        Method::GET,
        &format!("/api/v1/workspaces/{}/expenses/{id}", a.id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &router,
        Method::DELETE,
        &format!("/api/v1/workspaces/{}/expenses/{id}", b.id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, page) = send(
        &router,
        Method::GET,
        &format!("/api/v1/workspaces/{}/expenses", a.id),
        None,
    )
    .await;
    assert_eq!(page["total"], 1);

    let (status, _) = send(
        &router,
        Method::GET,
        "/api/v1/workspaces/missing/expenses",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_marketplace_install_and_uninstall() {
    let state = test_state();
    let publisher = workspace(&state, "Publisher").await;
    let buyer = workspace(&state, "Buyer").await;
    let template = state
        .db
        .create::<Template>(TemplateDraft {
            workspace_id: publisher.id.clone(),
            name: "Launch".to_string(),
            description: String::new(),
            category: "ops".to_string(),
            tasks: vec![
                TaskBlueprint {
                    title: "Plan".to_string(),
                    description: String::new(),
                    priority: TaskPriority::High,
                },
                TaskBlueprint {
                    title: "Ship".to_string(),
                    description: String::new(),
                    priority: TaskPriority::Medium,
                },
            ],
        })
        .await
        .unwrap();
    let router = app(state.clone());

    let (status, listing) = send(
        &router,
        Method::POST,
        "/api/v1/marketplace/listings",
        Some(json!({
            "workspace_id": publisher.id,
            "template_id": template.id,
            "title": "Launch kit",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let listing_id = listing["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &router,
        Method::DELETE,
        &format!("/api/v1/templates/{}", template.id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_type(&body), "conflict");

    let (status, installed) = send(
        &router,
        Method::POST,
        &format!("/api/v1/marketplace/listings/{listing_id}/install"),
        Some(json!({ "workspace_id": buyer.id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(installed["tasks"].as_array().unwrap().len(), 2);
    let installation_id = installed["installation"]["id"].as_str().unwrap().to_string();

    let (_, listing) = send(
        &router,
        Method::GET,
        &format!("/api/v1/marketplace/listings/{listing_id}"),
        None,
    )
    .await;
    assert_eq!(listing["install_count"], 1);

    let (_, installations) = send(
        &router,
        Method::GET,
        &format!("/api/v1/marketplace/installations?workspace_id={}", buyer.id),
        None,
    )
    .await;
    assert_eq!(installations["total"], 1);

    let path = format!("/api/v1/marketplace/installations/{installation_id}");
    let (status, removed) = send(&router, Method::DELETE, &path, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(removed["status"], "uninstalled");

    let (status, body) = send(&router, Method::DELETE, &path, None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_type(&body), "conflict");

    let (status, tasks) = send(
        &router,
        Method::POST,
        &format!("/api/v1/templates/{}/instantiate", template.id),
        Some(json!({ "workspace_id": buyer.id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(tasks.as_array().unwrap().len(), 2);
    assert_eq!(state.db.stats().await.tasks, 4);
}

#[tokio::test]
async fn test_security_policy_governs_membership() {
    let state = test_state();
    let ws = workspace(&state, "Acme").await;
    let router = app(state);

    let (status, policy) = send(
        &router,
        Method::GET,
        &format!("/api/v1/security/policies/{}", ws.id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(policy["allowed_domains"], json!([]));

    let (status, policy) = send(
        &router,
        Method::PUT,
        &format!("/api/v1/security/policies/{}", ws.id),
        Some(json!({ "allowed_domains": ["acme.com"], "require_mfa": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(policy["require_mfa"], true);

    let (status, body) = send(
        &router,
        Method::POST,
        "/api/v1/team/members",
        Some(json!({ "workspace_id": ws.id, "name": "Mallory", "email": "m@evil.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_type(&body), "policy_violation");

    let (status, member) = send(
        &router,
        Method::POST,
        "/api/v1/team/members",
        Some(json!({ "workspace_id": ws.id, "name": "Ada", "email": "ada@acme.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(member["role"], "member");
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let router = app(test_state());

    let request = Request::builder()
        .uri("/api/v1/health")
        .header("x-request-id", "req-42")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.headers()["x-request-id"], "req-42");
}
