//! CSV upload handlers

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Extension, Json,
};
use base64::Engine;
use serde::Deserialize;
use tracing::info;

use budgethub_core::ImportSummary;

use crate::{today, AppError, AppState, CurrentUser, MAX_UPLOAD_SIZE};

/// JSON upload body
#[derive(Debug, Deserialize)]
pub struct JsonUploadRequest {
    pub filename: Option<String>,
    /// Base64-encoded CSV file
    #[serde(default)]
    pub csv_data: String,
}

fn check_filename(filename: &str) -> Result<(), AppError> {
    if filename.trim().is_empty() {
        return Err(AppError::bad_request("No file selected"));
    }
    if !filename.to_lowercase().ends_with(".csv") {
        return Err(AppError::bad_request(
            "Invalid file type. Please upload a CSV file",
        ));
    }
    Ok(())
}

fn check_size(len: usize) -> Result<(), AppError> {
    if len > MAX_UPLOAD_SIZE {
        return Err(AppError::bad_request(&format!(
            "File too large. Maximum size is {} MB",
            MAX_UPLOAD_SIZE / 1024 / 1024
        )));
    }
    Ok(())
}

fn import(state: &AppState, user: &CurrentUser, data: &[u8]) -> Result<Json<ImportSummary>, AppError> {
    let summary = state
        .db
        .import_expenses_csv(user.id, data, today())
        .map_err(AppError::from_core)?;

    info!(
        user = %user.username,
        imported = summary.imported_count,
        errors = summary.error_count,
        "CSV upload processed"
    );
    Ok(Json(summary))
}

/// POST /api/upload - Import a CSV file sent as multipart field `file`
pub async fn upload_csv(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    mut multipart: Multipart,
) -> Result<Json<ImportSummary>, AppError> {
    let mut file_data: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(&format!("Failed to read form field: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        check_filename(field.file_name().unwrap_or(""))?;

        let bytes = field
            .bytes()
            .await
            .map_err(|_| AppError::bad_request("Failed to read file data"))?;
        check_size(bytes.len())?;

        file_data = Some(bytes.to_vec());
    }

    let data = file_data.ok_or_else(|| AppError::bad_request("No file provided"))?;
    import(&state, &user, &data)
}

/// POST /api/upload/json - Import a base64-encoded CSV file
pub async fn upload_json(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<JsonUploadRequest>,
) -> Result<Json<ImportSummary>, AppError> {
    if let Some(filename) = &req.filename {
        check_filename(filename)?;
    }
    if req.csv_data.trim().is_empty() {
        return Err(AppError::bad_request("No file provided"));
    }

    let data = base64::engine::general_purpose::STANDARD
        .decode(req.csv_data.trim())
        .map_err(|_| AppError::bad_request("csv_data is not valid base64"))?;
    check_size(data.len())?;

    import(&state, &user, &data)
}
