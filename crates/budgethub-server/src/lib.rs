//! BudgetHub Web Server
//!
//! Axum-based REST API for the BudgetHub budgeting app.
//!
//! Security features:
//! - Bearer-token sessions (HS256 JWT) for every `/api` route except
//!   registration, login and the session check
//! - Per-user ownership checks on expenses and budgets
//! - Restrictive CORS policy and security headers
//! - Sanitized error responses

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use chrono::NaiveDate;
use tower_http::{
    cors::CorsLayer, services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tracing::{error, info, warn};

use budgethub_core::{db::Database, Error as CoreError};

mod handlers;
pub mod session;

pub use session::{Claims, TokenManager};

/// Maximum CSV upload size (16 MB)
pub const MAX_UPLOAD_SIZE: usize = 16 * 1024 * 1024;

/// Environment variable holding the token signing secret
pub const SECRET_KEY_ENV: &str = "BUDGETHUB_SECRET_KEY";

/// Environment variable holding comma-separated CORS origins
pub const ALLOWED_ORIGINS_ENV: &str = "BUDGETHUB_ALLOWED_ORIGINS";

const DEV_SECRET_KEY: &str = "budgethub-development-secret-change-me";

/// Routes reachable without a session
const PUBLIC_API_PATHS: &[&str] = &["/api/auth/register", "/api/auth/login", "/api/auth/check"];

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// HMAC secret for session tokens
    pub secret_key: String,
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
    /// Session lifetime
    pub token_ttl_days: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            secret_key: DEV_SECRET_KEY.to_string(),
            allowed_origins: vec![],
            token_ttl_days: 30,
        }
    }
}

impl ServerConfig {
    /// Read `BUDGETHUB_SECRET_KEY` and `BUDGETHUB_ALLOWED_ORIGINS`
    pub fn from_env() -> Self {
        let mut config = Self::default();

        match std::env::var(SECRET_KEY_ENV) {
            Ok(secret) if !secret.trim().is_empty() => config.secret_key = secret,
            _ => warn!(
                "⚠️  {} not set - using development secret, do not expose to network!",
                SECRET_KEY_ENV
            ),
        }

        if let Ok(origins) = std::env::var(ALLOWED_ORIGINS_ENV) {
            config.allowed_origins = parse_origins(&origins);
        }

        config
    }
}

/// Split a comma-separated origin list, dropping blanks
pub fn parse_origins(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub config: ServerConfig,
    pub tokens: TokenManager,
}

/// The authenticated caller, inserted into request extensions by `auth_middleware`
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
}

/// Today's date in server local time
pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn is_public_path(path: &str) -> bool {
    !path.starts_with("/api/") || PUBLIC_API_PATHS.contains(&path)
}

/// Authentication middleware
///
/// Resolves the bearer token to a `CurrentUser` whenever one is present.
/// Protected routes without a valid token, or whose user has since been
/// deleted, get a 401.
async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    let current = match bearer_token(&request).and_then(|t| state.tokens.validate(t)) {
        Some(claims) => match state.db.get_user(claims.sub) {
            Ok(Some(user)) => Some(CurrentUser {
                id: user.id,
                username: user.username,
            }),
            Ok(None) => {
                warn!(user_id = claims.sub, path = %path, "Token for a deleted user");
                None
            }
            Err(e) => {
                error!(error = %e, "Failed to look up session user");
                None
            }
        },
        None => None,
    };

    match current {
        Some(user) => {
            tracing::debug!(user = %user.username, path = %path, "Authenticated request");
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        None if is_public_path(&path) => next.run(request).await,
        None => {
            warn!(path = %path, "Unauthorized request - no valid session");
            AppError::unauthorized("Authentication required").into_response()
        }
    }
}

/// Create the application router
pub fn create_router(db: Database, static_dir: Option<&str>, config: ServerConfig) -> Router {
    let tokens = TokenManager::new(&config.secret_key, config.token_ttl_days);
    let allowed_origins = config.allowed_origins.clone();

    let state = Arc::new(AppState { db, config, tokens });

    let api_routes = Router::new()
        // Session
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login))
        .route("/auth/logout", post(handlers::logout))
        .route("/auth/check", get(handlers::check_auth))
        // Dashboard
        .route("/dashboard", get(handlers::get_dashboard))
        // Expenses
        .route(
            "/expenses",
            get(handlers::list_expenses).post(handlers::create_expense),
        )
        .route(
            "/expenses/:id",
            get(handlers::get_expense)
                .put(handlers::update_expense)
                .delete(handlers::delete_expense),
        )
        // Budgets
        .route(
            "/budgets",
            get(handlers::list_budgets).post(handlers::set_budget),
        )
        .route("/budgets/:id", delete(handlers::delete_budget))
        // Charts
        .route("/charts/category", get(handlers::category_chart))
        .route("/charts/monthly", get(handlers::monthly_chart))
        .route(
            "/charts/category-monthly",
            get(handlers::category_monthly_chart),
        )
        // Categorization
        .route("/categories", get(handlers::list_categories))
        .route("/categorize", get(handlers::categorize))
        // Import/export
        .route("/export", get(handlers::export_expenses))
        .route("/upload", post(handlers::upload_csv))
        .route("/upload/json", post(handlers::upload_json));

    // Build CORS layer
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];
    let cors = if allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    };

    // CSP: same-origin scripts, inline styles allowed for the bundled UI
    let csp_value = HeaderValue::from_static(
        "default-src 'self'; script-src 'self'; style-src 'self' 'unsafe-inline'; img-src 'self' blob: data:; font-src 'self'; connect-src 'self'; frame-ancestors 'none'"
    );

    let mut app = Router::new()
        .nest("/api", api_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
        // Base64 upload bodies are larger than the decoded file
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE * 2))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_XSS_PROTECTION,
            HeaderValue::from_static("1; mode=block"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            csp_value,
        ));

    // Serve the web UI if a directory was provided
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}

/// Start the server with configuration read from the environment
pub async fn serve(
    db: Database,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
) -> anyhow::Result<()> {
    serve_with_config(db, host, port, static_dir, ServerConfig::from_env()).await
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    db: Database,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    if config.allowed_origins.is_empty() {
        info!("CORS restricted to same-origin requests");
    } else {
        info!(origins = ?config.allowed_origins, "CORS origins allowed");
    }

    let app = create_router(db, static_dir, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    fn with_status(status: StatusCode, msg: &str) -> Self {
        Self {
            status,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn bad_request(msg: &str) -> Self {
        Self::with_status(StatusCode::BAD_REQUEST, msg)
    }

    pub fn unauthorized(msg: &str) -> Self {
        Self::with_status(StatusCode::UNAUTHORIZED, msg)
    }

    pub fn forbidden(msg: &str) -> Self {
        Self::with_status(StatusCode::FORBIDDEN, msg)
    }

    pub fn not_found(msg: &str) -> Self {
        Self::with_status(StatusCode::NOT_FOUND, msg)
    }

    pub fn conflict(msg: &str) -> Self {
        Self::with_status(StatusCode::CONFLICT, msg)
    }

    pub fn internal(msg: &str) -> Self {
        Self::with_status(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }

    /// Map a core error to its client-facing status.
    ///
    /// Storage and I/O failures stay opaque 500s.
    pub fn from_core(err: CoreError) -> Self {
        match err {
            CoreError::InvalidData(msg) | CoreError::Import(msg) => Self::bad_request(&msg),
            CoreError::NotFound(msg) => Self::not_found(&msg),
            CoreError::Forbidden(msg) => Self::forbidden(&msg),
            CoreError::Conflict(msg) => Self::conflict(&msg),
            CoreError::Auth(msg) => Self::unauthorized(&msg),
            other => Self::from(other),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}
