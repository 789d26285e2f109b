//! Budget handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use budgethub_core::{analytics, models::Budget, BudgetUpsert};

use crate::{today, AppError, AppState, CurrentUser};

/// Month selector; both default to the current month
#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    pub month: Option<u32>,
    pub year: Option<i32>,
}

/// A budget with its utilization for the selected month
#[derive(Serialize)]
pub struct BudgetStatusEntry {
    pub budget: Budget,
    pub amount: f64,
    pub spent: f64,
    pub remaining: f64,
    pub percentage: f64,
    pub is_over: bool,
    pub is_warning: bool,
}

#[derive(Serialize)]
pub struct BudgetListResponse {
    pub budgets: Vec<BudgetStatusEntry>,
}

#[derive(Debug, Deserialize)]
pub struct SetBudgetRequest {
    #[serde(default)]
    pub category: String,
    /// Number or numeric string
    pub amount: Option<Value>,
    pub month: Option<u32>,
    pub year: Option<i32>,
}

#[derive(Serialize)]
pub struct SetBudgetResponse {
    pub budget: Budget,
    pub message: String,
}

fn resolve_month(month: Option<u32>, year: Option<i32>) -> Result<(u32, i32), AppError> {
    let now = today();
    let month = month.unwrap_or(now.month());
    if !(1..=12).contains(&month) {
        return Err(AppError::bad_request("Month must be between 1 and 12"));
    }
    Ok((month, year.unwrap_or(now.year())))
}

/// GET /api/budgets - Budget statuses for a month (default: current)
pub async fn list_budgets(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<MonthQuery>,
) -> Result<Json<BudgetListResponse>, AppError> {
    let (month, year) = resolve_month(params.month, params.year)?;

    let mut budgets = Vec::new();
    for budget in state
        .db
        .list_budgets(user.id, month, year)
        .map_err(AppError::from_core)?
    {
        let status = analytics::budget_status(&state.db, user.id, &budget.category, month, year)
            .map_err(AppError::from_core)?;
        if let Some(status) = status {
            budgets.push(BudgetStatusEntry {
                budget,
                amount: status.budget,
                spent: status.spent,
                remaining: status.remaining,
                percentage: status.percentage,
                is_over: status.is_over,
                is_warning: status.is_warning,
            });
        }
    }

    Ok(Json(BudgetListResponse { budgets }))
}

/// POST /api/budgets - Set or replace a category budget
pub async fn set_budget(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<SetBudgetRequest>,
) -> Result<(StatusCode, Json<SetBudgetResponse>), AppError> {
    if req.category.trim().is_empty() {
        return Err(AppError::bad_request("Category is required"));
    }
    let amount = req
        .amount
        .as_ref()
        .and_then(|v| match v {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        })
        .filter(|a| a.is_finite() && *a > 0.0)
        .ok_or_else(|| AppError::bad_request("Valid amount is required"))?;
    let (month, year) = resolve_month(req.month, req.year)?;

    let result = state
        .db
        .upsert_budget(user.id, &req.category, amount, month, year)
        .map_err(AppError::from_core)?;

    let message = match result {
        BudgetUpsert::Created(_) => "Budget set successfully",
        BudgetUpsert::Updated(_) => "Budget updated successfully",
    };
    info!(user = %user.username, category = %req.category, amount, month, year, "{}", message);

    Ok((
        StatusCode::CREATED,
        Json(SetBudgetResponse {
            budget: result.into_budget(),
            message: message.to_string(),
        }),
    ))
}

/// DELETE /api/budgets/:id - Remove one of the caller's budgets
pub async fn delete_budget(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    state
        .db
        .delete_budget(user.id, id)
        .map_err(AppError::from_core)?;

    info!(user = %user.username, budget_id = id, "Budget deleted");
    Ok(Json(serde_json::json!({ "message": "Budget deleted successfully" })))
}
