//! Expenses nested under their workspace

use axum::{extract::State, http::StatusCode, Json};
use serde_json::json;
use worknest_domain::{Expense, ExpenseDraft, ExpensePatch, ListQuery, Page};
use worknest_store::StoreError;

use super::records::Resource;
use crate::{
    error::ApiResult,
    extract::{ApiJson, ApiPath, ApiQuery},
    middleware::RequestContext,
    state::AppState,
};

/// Load an expense, treating one from another workspace as missing
async fn scoped_expense(state: &AppState, workspace_id: &str, expense_id: &str) -> ApiResult<Expense> {
    let expense = state.db.get::<Expense>(expense_id).await?;
    if expense.workspace_id != workspace_id {
        return Err(StoreError::not_found("expense", expense_id).into());
    }
    Ok(expense)
}

pub async fn list_expenses(
    State(state): State<AppState>,
    ApiPath(workspace_id): ApiPath<String>,
    ApiQuery(mut query): ApiQuery<ListQuery>,
) -> ApiResult<Json<Page<Expense>>> {
    state.db.require_workspace(&workspace_id).await?;
    query.workspace_id = Some(workspace_id);

    Ok(Json(state.db.list::<Expense>(&query).await))
}

pub async fn create_expense(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(workspace_id): ApiPath<String>,
    ApiJson(mut draft): ApiJson<ExpenseDraft>,
) -> ApiResult<(StatusCode, Json<Expense>)> {
    draft.workspace_id = workspace_id;
    let expense = state.db.create::<Expense>(draft).await?;

    state
        .audit(
            &ctx,
            expense.audit_entry("submitted").with_details(json!({
                "amount_cents": expense.amount_cents,
                "currency": expense.currency,
            })),
        )
        .await;

    Ok((StatusCode::CREATED, Json(expense)))
}

pub async fn get_expense(
    State(state): State<AppState>,
    ApiPath((workspace_id, expense_id)): ApiPath<(String, String)>,
) -> ApiResult<Json<Expense>> {
    Ok(Json(scoped_expense(&state, &workspace_id, &expense_id).await?))
}

pub async fn update_expense(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath((workspace_id, expense_id)): ApiPath<(String, String)>,
    ApiJson(patch): ApiJson<ExpensePatch>,
) -> ApiResult<Json<Expense>> {
    scoped_expense(&state, &workspace_id, &expense_id).await?;

    let details = json!({ "patch": patch });
    let expense = state.db.update::<Expense>(&expense_id, patch).await?;
    state
        .audit(&ctx, expense.audit_entry("updated").with_details(details))
        .await;

    Ok(Json(expense))
}

pub async fn delete_expense(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath((workspace_id, expense_id)): ApiPath<(String, String)>,
) -> ApiResult<Json<Expense>> {
    scoped_expense(&state, &workspace_id, &expense_id).await?;

    let expense = state.db.delete::<Expense>(&expense_id).await?;
    state.audit(&ctx, expense.audit_entry("deleted")).await;

    Ok(Json(expense))
}
