//! HTTP API server.
//!
//! Exposes summarize and answer over JSON. Each client may create its own
//! session; requests without a `session_id` share the default session.

use crate::cli::Output;
use crate::config::Settings;
use crate::error::{YtqaError, SERVICE_UNAVAILABLE};
use crate::orchestrator::Orchestrator;
use crate::session::{SessionRegistry, SessionStatus, SharedSession};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info, warn};
use uuid::Uuid;

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Shared application state.
pub struct AppState {
    pub orchestrator: Orchestrator,
    pub sessions: SessionRegistry,
}

impl AppState {
    pub fn new(orchestrator: Orchestrator, sessions: SessionRegistry) -> Self {
        Self { orchestrator, sessions }
    }

    fn session(&self, id: Option<Uuid>) -> Result<SharedSession, ApiError> {
        self.sessions.get(id).ok_or(ApiError::UnknownSession(id.unwrap_or_default()))
    }
}

/// Build the API router.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/sessions", post(create_session))
        .route("/sessions/{id}", get(get_session).delete(delete_session))
        .route("/summarize", post(summarize))
        .route("/answer", post(answer))
        .layer(cors)
        .with_state(state)
}

/// Run the HTTP API server.
pub async fn run_serve(host: Option<String>, port: Option<u16>, settings: Settings) -> anyhow::Result<()> {
    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);

    let state = Arc::new(AppState::new(
        Orchestrator::new(&settings)?,
        SessionRegistry::from_settings(&settings.session),
    ));
    tokio::spawn(expire_sessions(state.clone()));
    let app = router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    Output::header("ytqa API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET    /health");
    Output::kv("New session", "POST   /sessions");
    Output::kv("Session status", "GET    /sessions/{id}");
    Output::kv("End session", "DELETE /sessions/{id}");
    Output::kv("Summarize", "POST   /summarize");
    Output::kv("Answer", "POST   /answer");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Periodically drop idle sessions.
async fn expire_sessions(state: Arc<AppState>) {
    let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
    loop {
        interval.tick().await;
        let removed = state.sessions.remove_expired();
        if removed > 0 {
            debug!("Expired {} idle sessions, {} remain", removed, state.sessions.len());
        }
    }
}

// === Request/Response Types ===

#[derive(Debug, Default, Deserialize)]
pub struct SummarizeRequest {
    #[serde(default)]
    pub session_id: Option<Uuid>,
    #[serde(default)]
    pub video_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SummarizeResponse {
    pub summary: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct AnswerRequest {
    #[serde(default)]
    pub session_id: Option<Uuid>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub question: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct SessionCreated {
    pub session_id: Uuid,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Handler error with its HTTP mapping.
#[derive(Debug)]
pub enum ApiError {
    UnknownSession(Uuid),
    Pipeline(YtqaError),
}

impl From<YtqaError> for ApiError {
    fn from(error: YtqaError) -> Self {
        ApiError::Pipeline(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::UnknownSession(id) => (StatusCode::NOT_FOUND, format!("Unknown session: {}", id)),
            ApiError::Pipeline(e) if e.is_user_error() => (StatusCode::BAD_REQUEST, e.to_string()),
            ApiError::Pipeline(e) => {
                warn!("Request failed: {}", e);
                (StatusCode::SERVICE_UNAVAILABLE, SERVICE_UNAVAILABLE.to_string())
            }
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn create_session(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let session_id = state.sessions.create();
    info!("Created session {}", session_id);
    (StatusCode::CREATED, Json(SessionCreated { session_id }))
}

async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionStatus>, ApiError> {
    let session = state.session(Some(id))?;
    let status = session.lock().await.status();
    Ok(Json(status))
}

async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.sessions.remove(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::UnknownSession(id))
    }
}

async fn summarize(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SummarizeRequest>,
) -> Result<Json<SummarizeResponse>, ApiError> {
    let session = state.session(req.session_id)?;
    let mut session = session.lock().await;

    let summary = state
        .orchestrator
        .summarize(&mut session, req.video_url.as_deref())
        .await?;

    Ok(Json(SummarizeResponse { summary }))
}

async fn answer(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>, ApiError> {
    let session = state.session(req.session_id)?;
    let mut session = session.lock().await;

    let answer = state
        .orchestrator
        .answer(&mut session, req.video_url.as_deref(), req.question.as_deref())
        .await?;

    Ok(Json(AnswerResponse { answer }))
}
