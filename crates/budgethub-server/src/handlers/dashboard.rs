//! Dashboard handler

use std::sync::Arc;

use axum::{extract::State, Extension, Json};

use budgethub_core::analytics::{self, Dashboard};

use crate::{today, AppError, AppState, CurrentUser};

/// GET /api/dashboard - Weekly, monthly and budget summary for today
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Dashboard>, AppError> {
    let dashboard =
        analytics::build_dashboard(&state.db, user.id, today()).map_err(AppError::from_core)?;
    Ok(Json(dashboard))
}
