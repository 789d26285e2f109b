//! Registration and session handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use budgethub_core::{models::UserInfo, Error as CoreError, Registration};

use crate::{AppError, AppState, CurrentUser};

/// Response for register and login
#[derive(Serialize)]
pub struct SessionResponse {
    pub message: String,
    pub user: UserInfo,
    pub token: String,
}

/// Login form
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Response for /api/auth/check
#[derive(Serialize)]
pub struct CheckResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserInfo>,
}

/// POST /api/auth/register - Create an account and start a session
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(registration): Json<Registration>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    // Duplicate username/email is a form error like any other
    let user = state
        .db
        .register_user(&registration)
        .map_err(|e| match e {
            CoreError::Conflict(msg) => AppError::bad_request(&msg),
            other => AppError::from_core(other),
        })?;

    let token = state.tokens.issue(&user)?;

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            message: "Registration successful".to_string(),
            user: UserInfo::from(&user),
            token,
        }),
    ))
}

/// POST /api/auth/login - Exchange credentials for a session token
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    if req.username.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::bad_request(
            "Username and password are required",
        ));
    }

    let user = state
        .db
        .authenticate(&req.username, &req.password)
        .map_err(AppError::from_core)?;

    let token = state.tokens.issue(&user)?;
    info!(user = %user.username, "User logged in");

    Ok(Json(SessionResponse {
        message: "Login successful".to_string(),
        user: UserInfo::from(&user),
        token,
    }))
}

/// POST /api/auth/logout - End the session (client discards its token)
pub async fn logout(Extension(user): Extension<CurrentUser>) -> Json<serde_json::Value> {
    info!(user = %user.username, "User logged out");
    Json(serde_json::json!({ "message": "Logged out successfully" }))
}

/// GET /api/auth/check - Report whether the caller holds a valid session
pub async fn check_auth(
    State(state): State<Arc<AppState>>,
    user: Option<Extension<CurrentUser>>,
) -> Result<Json<CheckResponse>, AppError> {
    let user = match user {
        Some(Extension(current)) => state.db.get_user(current.id)?,
        None => None,
    };

    Ok(Json(CheckResponse {
        authenticated: user.is_some(),
        user: user.as_ref().map(UserInfo::from),
    }))
}
