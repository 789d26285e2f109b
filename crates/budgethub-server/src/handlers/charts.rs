//! Chart data handlers

use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use chrono::Datelike;
use serde::Serialize;

use budgethub_core::{analytics, Ledger};

use crate::{today, AppError, AppState, CurrentUser};

/// Single-series chart
#[derive(Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub data: Vec<f64>,
}

/// This month versus last month, per category
#[derive(Serialize)]
pub struct ComparisonChartData {
    pub labels: Vec<String>,
    pub current: Vec<f64>,
    pub previous: Vec<f64>,
}

/// GET /api/charts/category - All-time spending per category
pub async fn category_chart(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ChartData>, AppError> {
    let totals = state
        .db
        .category_totals(user.id)
        .map_err(AppError::from_core)?;

    let (labels, data) = totals.into_iter().map(|t| (t.category, t.total)).unzip();
    Ok(Json(ChartData { labels, data }))
}

/// GET /api/charts/monthly - Spending trend over recent months
pub async fn monthly_chart(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ChartData>, AppError> {
    let trends = analytics::monthly_trends(&state.db, user.id, today(), analytics::TREND_MONTHS)
        .map_err(AppError::from_core)?;

    let (labels, data) = trends.into_iter().map(|p| (p.label, p.total)).unzip();
    Ok(Json(ChartData { labels, data }))
}

/// GET /api/charts/category-monthly - Month-over-month comparison per category
pub async fn category_monthly_chart(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ComparisonChartData>, AppError> {
    let now = today();
    let comparisons =
        analytics::category_month_over_month(&state.db, user.id, now.month(), now.year())
            .map_err(AppError::from_core)?;

    let mut chart = ComparisonChartData {
        labels: Vec::with_capacity(comparisons.len()),
        current: Vec::with_capacity(comparisons.len()),
        previous: Vec::with_capacity(comparisons.len()),
    };
    for c in comparisons {
        chart.labels.push(c.category);
        chart.current.push(c.current);
        chart.previous.push(c.previous);
    }

    Ok(Json(chart))
}
