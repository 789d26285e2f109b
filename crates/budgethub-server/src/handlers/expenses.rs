//! Expense handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use budgethub_core::models::{Expense, ExpenseFilter, ExpenseSort, NewExpense};

use crate::{AppError, AppState, CurrentUser};

/// Query parameters for listing expenses
#[derive(Debug, Default, Deserialize)]
pub struct ListExpensesQuery {
    /// Substring match on description
    pub search: Option<String>,
    pub category: Option<String>,
    /// YYYY-MM-DD
    pub date_from: Option<String>,
    /// YYYY-MM-DD
    pub date_to: Option<String>,
    /// date_asc, date_desc, amount_asc, amount_desc or category
    pub sort: Option<String>,
}

/// Expense list plus the categories the user has used
#[derive(Serialize)]
pub struct ExpenseListResponse {
    pub expenses: Vec<Expense>,
    pub categories: Vec<String>,
}

#[derive(Serialize)]
pub struct ExpenseResponse {
    pub expense: Expense,
}

/// Create/update body. Fields are optional so missing ones get a
/// readable 400 instead of a deserialization rejection.
#[derive(Debug, Default, Deserialize)]
pub struct ExpenseBody {
    pub description: Option<String>,
    /// Number or numeric string
    pub amount: Option<Value>,
    pub category: Option<String>,
    pub date: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn parse_date_param(value: Option<String>, name: &str) -> Result<Option<NaiveDate>, AppError> {
    non_empty(value)
        .map(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d"))
        .transpose()
        .map_err(|_| {
            AppError::bad_request(&format!("Invalid '{}' date format (use YYYY-MM-DD)", name))
        })
}

fn parse_amount(value: &Value) -> Option<f64> {
    let amount = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    amount.is_finite().then_some(amount)
}

impl ExpenseBody {
    /// Check required fields and build the record, first failure wins
    fn into_new_expense(self) -> Result<NewExpense, AppError> {
        let description =
            non_empty(self.description).ok_or_else(|| AppError::bad_request("Description is required"))?;

        let amount = self
            .amount
            .as_ref()
            .and_then(parse_amount)
            .filter(|a| *a > 0.0)
            .ok_or_else(|| AppError::bad_request("Valid amount is required"))?;

        let category =
            non_empty(self.category).ok_or_else(|| AppError::bad_request("Category is required"))?;

        let date = parse_date_param(self.date, "date")?
            .ok_or_else(|| AppError::bad_request("Date is required"))?;

        Ok(NewExpense {
            description,
            amount,
            category,
            date,
        })
    }

    fn is_complete(&self) -> bool {
        let present = |s: &Option<String>| s.as_deref().is_some_and(|v| !v.trim().is_empty());
        present(&self.description)
            && self.amount.as_ref().is_some_and(|a| !a.is_null())
            && present(&self.category)
            && present(&self.date)
    }
}

/// GET /api/expenses - List expenses with search, filters and sort
pub async fn list_expenses(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<ListExpensesQuery>,
) -> Result<Json<ExpenseListResponse>, AppError> {
    let filter = ExpenseFilter {
        search: non_empty(params.search),
        category: non_empty(params.category),
        date_from: parse_date_param(params.date_from, "date_from")?,
        date_to: parse_date_param(params.date_to, "date_to")?,
        // Unknown sort keys fall back to newest first
        sort: params
            .sort
            .and_then(|s| s.parse::<ExpenseSort>().ok())
            .unwrap_or_default(),
        limit: None,
    };

    let expenses = state
        .db
        .list_expenses(user.id, &filter)
        .map_err(AppError::from_core)?;
    let categories = state
        .db
        .expense_categories(user.id)
        .map_err(AppError::from_core)?;

    Ok(Json(ExpenseListResponse {
        expenses,
        categories,
    }))
}

/// POST /api/expenses - Record an expense
pub async fn create_expense(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<ExpenseBody>,
) -> Result<(StatusCode, Json<ExpenseResponse>), AppError> {
    let new_expense = body.into_new_expense()?;
    let expense = state
        .db
        .insert_expense(user.id, &new_expense)
        .map_err(AppError::from_core)?;

    info!(user = %user.username, expense_id = expense.id, "Expense created");
    Ok((StatusCode::CREATED, Json(ExpenseResponse { expense })))
}

/// GET /api/expenses/:id - Get one of the caller's expenses
pub async fn get_expense(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<ExpenseResponse>, AppError> {
    let expense = state
        .db
        .get_owned_expense(user.id, id)
        .map_err(AppError::from_core)?;
    Ok(Json(ExpenseResponse { expense }))
}

/// PUT /api/expenses/:id - Replace every field of an expense
pub async fn update_expense(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(body): Json<ExpenseBody>,
) -> Result<Json<ExpenseResponse>, AppError> {
    // Ownership first so a foreign id is 403 regardless of the body
    state
        .db
        .get_owned_expense(user.id, id)
        .map_err(AppError::from_core)?;

    if !body.is_complete() {
        return Err(AppError::bad_request("All fields are required"));
    }
    let update = body.into_new_expense()?;

    let expense = state
        .db
        .update_expense(user.id, id, &update)
        .map_err(AppError::from_core)?;

    info!(user = %user.username, expense_id = id, "Expense updated");
    Ok(Json(ExpenseResponse { expense }))
}

/// DELETE /api/expenses/:id - Delete one of the caller's expenses
pub async fn delete_expense(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    state
        .db
        .delete_expense(user.id, id)
        .map_err(AppError::from_core)?;

    info!(user = %user.username, expense_id = id, "Expense deleted");
    Ok(Json(serde_json::json!({ "message": "Expense deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount_accepts_numbers_and_strings() {
        assert_eq!(parse_amount(&serde_json::json!(12.5)), Some(12.5));
        assert_eq!(parse_amount(&serde_json::json!(" 7 ")), Some(7.0));
        assert_eq!(parse_amount(&serde_json::json!("seven")), None);
        assert_eq!(parse_amount(&serde_json::json!(true)), None);
    }

    #[test]
    fn test_body_validation_order() {
        let body = ExpenseBody {
            description: Some("  ".into()),
            amount: Some(serde_json::json!(-1)),
            ..Default::default()
        };
        let err = body.into_new_expense().unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let body = ExpenseBody {
            description: Some("Lunch".into()),
            amount: Some(serde_json::json!("12.00")),
            category: Some("Food".into()),
            date: Some("2024-03-01".into()),
        };
        assert!(body.is_complete());
        let expense = body.into_new_expense().unwrap();
        assert_eq!(expense.amount, 12.0);
        assert_eq!(expense.date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }
}
