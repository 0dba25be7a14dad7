use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Form, Router,
};
use columbus_models::{
    AppStatusResponse, Credentials, InstanceKey, InstanceSpec, StartReport, StopReport,
};
use columbus_orchestrations::{LifecycleError, LifecycleOrchestrator};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared API state
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<LifecycleOrchestrator>,
    /// Cancelled on shutdown; in-flight starts stop waiting on the cluster
    pub shutdown: CancellationToken,
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/no-of-pods", get(no_of_pods))
        .route("/start-app", post(start_app))
        .route("/stop-app", post(stop_app))
        .route("/delete-app-storage", post(delete_app_storage))
        .route("/get-app-status/*path", get(get_app_status))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the API server and serve until the shutdown token fires
pub async fn start_server(addr: &str, state: AppState) -> Result<()> {
    let shutdown = state.shutdown.clone();
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("✓ API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}

// ============================================================================
// Health Check
// ============================================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "columbus-launcher",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn no_of_pods(State(state): State<AppState>) -> Result<String, AppError> {
    let count = state
        .orchestrator
        .cluster()
        .count_pods()
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(format!("There are {} pods in the cluster\n", count))
}

// ============================================================================
// Instances
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StartAppForm {
    image_path: Option<String>,
    username: Option<String>,
    app_name: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InstanceForm {
    username: Option<String>,
    app_name: Option<String>,
}

impl InstanceForm {
    fn key(self) -> Result<InstanceKey, AppError> {
        instance_key(self.app_name, self.username)
    }
}

/// Trimmed, non-empty form value
fn required(field: &str, value: Option<String>) -> Result<String, AppError> {
    match value.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(AppError::BadRequest(format!("Missing form field '{}'", field))),
    }
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn instance_key(app_name: Option<String>, username: Option<String>) -> Result<InstanceKey, AppError> {
    let app_name = required("appName", app_name)?;
    let username = required("username", username)?;
    InstanceKey::try_new(&app_name, &username).map_err(|e| AppError::BadRequest(e.to_string()))
}

async fn start_app(
    State(state): State<AppState>,
    Form(form): Form<StartAppForm>,
) -> Result<Json<StartReport>, AppError> {
    let credentials = match (optional(form.client_id), optional(form.client_secret)) {
        (None, None) => None,
        (Some(client_id), Some(client_secret)) => Some(Credentials {
            client_id,
            client_secret,
        }),
        _ => {
            return Err(AppError::BadRequest(
                "clientId and clientSecret must be sent together".to_string(),
            ))
        }
    };
    let spec = InstanceSpec {
        image_path: required("imagePath", form.image_path)?,
        key: instance_key(form.app_name, form.username)?,
        credentials,
    };

    let cancel = state.shutdown.child_token();
    let report = state.orchestrator.start(spec, &cancel).await?;
    Ok(Json(report))
}

async fn stop_app(
    State(state): State<AppState>,
    Form(form): Form<InstanceForm>,
) -> Result<Json<StopReport>, AppError> {
    let key = form.key()?;
    Ok(Json(state.orchestrator.stop(&key).await?))
}

async fn delete_app_storage(
    State(state): State<AppState>,
    Form(form): Form<InstanceForm>,
) -> Result<Json<serde_json::Value>, AppError> {
    let key = form.key()?;
    state.orchestrator.delete_storage(&key).await?;
    Ok(Json(serde_json::json!({
        "deleted": key.resource_name()
    })))
}

/// `/get-app-status/<username>/<appName>/...`; anything after the app name is ignored
async fn get_app_status(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Json<AppStatusResponse>, AppError> {
    let mut segments = path.split('/').filter(|segment| !segment.is_empty());
    let (username, app_name) = match (segments.next(), segments.next()) {
        (Some(username), Some(app_name)) => (username, app_name),
        _ => {
            return Err(AppError::BadRequest(
                "Expected /get-app-status/<username>/<appName>/".to_string(),
            ))
        }
    };

    let key = InstanceKey::try_new(app_name, username)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let status = state.orchestrator.get_status(&key).await?;
    Ok(Json(AppStatusResponse { status }))
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    NotFound(String),
    Timeout(String),
    Unavailable(String),
    Internal(String),
}

impl From<LifecycleError> for AppError {
    fn from(err: LifecycleError) -> Self {
        let message = err.to_string();
        match err {
            LifecycleError::InvalidKey(_) => AppError::BadRequest(message),
            _ if err.is_not_found() => AppError::NotFound(message),
            LifecycleError::Timeout { .. } => AppError::Timeout(message),
            LifecycleError::Cancelled { .. } => AppError::Unavailable(message),
            _ => AppError::Internal(message),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Timeout(msg) => (StatusCode::GATEWAY_TIMEOUT, msg),
            AppError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
