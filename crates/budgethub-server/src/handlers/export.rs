//! CSV export handler

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, Response, StatusCode},
    Extension,
};
use tracing::info;

use budgethub_core::export::export_filename;

use crate::{today, AppError, AppState, CurrentUser};

/// GET /api/export - Download the caller's expenses as CSV, newest first
pub async fn export_expenses(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Response<Body>, AppError> {
    let csv = state
        .db
        .export_expenses_csv(user.id)
        .map_err(AppError::from_core)?;
    let rows = csv.lines().count().saturating_sub(1);
    info!(user = %user.username, rows, "Exported expenses to CSV");

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/csv; charset=utf-8")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", export_filename(today())),
        )
        .body(Body::from(csv))
        .map_err(|e| AppError::internal(&e.to_string()))
}
