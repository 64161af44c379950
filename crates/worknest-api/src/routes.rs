//! API route definitions
//!
//! Every feature area is its own sub-router mounted under the `/api/v1` namespace;
//! the namespace only delegates, so a sub-router's response is returned unchanged.

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use worknest_domain::{
    Announcement, Installation, Listing, Member, Recognition, Task, Template, Workspace,
};

use crate::{
    handlers::{
        lifecycle, marketplace, platform, records, security, tasks, templates, workspaces,
    },
    middleware::logging_middleware,
    state::AppState,
};

/// Prefix every route is mounted under
pub const API_NAMESPACE: &str = "/api/v1";

/// Mount prefix and router of every feature area
pub fn sub_routers() -> Vec<(&'static str, Router<AppState>)> {
    vec![
        ("/workspaces", workspace_routes()),
        ("/team", team_routes()),
        ("/tasks", task_routes()),
        ("/communication", communication_routes()),
        ("/templates", template_routes()),
        ("/marketplace", marketplace_routes()),
        ("/security", security_routes()),
        ("/lifecycle", lifecycle_routes()),
    ]
}

/// API routes, without middleware
pub fn api_routes() -> Router<AppState> {
    let namespace = sub_routers().into_iter().fold(
        Router::new()
            .route("/health", get(platform::health_check))
            .route("/permissions", get(platform::permissions))
            .route("/roles", get(platform::roles))
            .route("/stats", get(platform::stats)),
        |router, (prefix, sub_router)| router.nest(prefix, sub_router),
    );

    Router::new().nest(API_NAMESPACE, namespace)
}

/// The full application: routes, logging, tracing and CORS bound to `state`
pub fn app(state: AppState) -> Router {
    api_routes()
        .layer(from_fn_with_state(state.clone(), logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub fn workspace_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(records::list::<Workspace>).post(records::create::<Workspace>),
        )
        .route(
            "/:workspace_id",
            get(records::get::<Workspace>)
                .patch(records::update::<Workspace>)
                .delete(records::delete::<Workspace>),
        )
        .route(
            "/:workspace_id/expenses",
            get(workspaces::list_expenses).post(workspaces::create_expense),
        )
        .route(
            "/:workspace_id/expenses/:expense_id",
            get(workspaces::get_expense)
                .patch(workspaces::update_expense)
                .delete(workspaces::delete_expense),
        )
}

pub fn team_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/members",
            get(records::list::<Member>).post(records::create::<Member>),
        )
        .route(
            "/members/:id",
            get(records::get::<Member>)
                .patch(records::update::<Member>)
                .delete(records::delete::<Member>),
        )
}

pub fn task_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(records::list::<Task>)
                .post(records::create::<Task>)
                .patch(tasks::bulk_update)
                .delete(tasks::bulk_delete),
        )
        .route(
            "/:id",
            get(records::get::<Task>)
                .patch(records::update::<Task>)
                .delete(records::delete::<Task>),
        )
}

pub fn communication_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/announcements",
            get(records::list::<Announcement>).post(records::create::<Announcement>),
        )
        .route(
            "/announcements/:id",
            get(records::get::<Announcement>)
                .patch(records::update::<Announcement>)
                .delete(records::delete::<Announcement>),
        )
        .route(
            "/recognitions",
            get(records::list::<Recognition>).post(records::create::<Recognition>),
        )
        .route(
            "/recognitions/:id",
            get(records::get::<Recognition>)
                .patch(records::update::<Recognition>)
                .delete(records::delete::<Recognition>),
        )
}

pub fn template_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(records::list::<Template>).post(records::create::<Template>),
        )
        .route(
            "/:id",
            get(records::get::<Template>)
                .patch(records::update::<Template>)
                .delete(records::delete::<Template>),
        )
        .route("/:id/instantiate", post(templates::instantiate))
}

pub fn marketplace_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/listings",
            get(records::list::<Listing>).post(records::create::<Listing>),
        )
        .route(
            "/listings/:id",
            get(records::get::<Listing>)
                .patch(records::update::<Listing>)
                .delete(records::delete::<Listing>),
        )
        .route("/listings/:id/install", post(marketplace::install))
        .route("/installations", get(records::list::<Installation>))
        .route(
            "/installations/:id",
            get(records::get::<Installation>).delete(marketplace::uninstall),
        )
}

pub fn security_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/policies/:workspace_id",
            get(security::get_policy).put(security::update_policy),
        )
        .route("/audit", get(security::audit_trail))
}

pub fn lifecycle_routes() -> Router<AppState> {
    Router::new()
        .route("/workspaces/:workspace_id/archive", post(lifecycle::archive))
        .route("/workspaces/:workspace_id/suspend", post(lifecycle::suspend))
        .route("/workspaces/:workspace_id/restore", post(lifecycle::restore))
        .route("/workspaces/:workspace_id/events", get(lifecycle::events))
}
