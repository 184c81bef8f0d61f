//! HTTP request handlers

use super::assets::{get_index_html, serve_static};
use super::sse::sse_stream;
use super::types::{
    AttachRequest, DraftRequest, ErrorResponse, StateResponse, SubmitRequest, VersionResponse,
};
use super::AppState;
use crate::runtime::{SseEvent, StoreError};
use crate::state_machine::Attachment;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Root serves the SPA
        .route("/", get(serve_spa))
        .route("/assets/*path", get(serve_static))
        // Conversation snapshot and live updates
        .route("/api/state", get(get_state))
        .route("/api/events", get(stream_events))
        // User intents
        .route("/api/draft", put(update_draft))
        .route("/api/submit", post(submit))
        .route(
            "/api/attachment",
            post(attach_file).delete(clear_attachment),
        )
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// SPA Handler
// ============================================================

async fn serve_spa() -> impl IntoResponse {
    match get_index_html() {
        Some(content) => Html(content).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Html("<h1>404 - UI not found</h1>".to_string()),
        )
            .into_response(),
    }
}

// ============================================================
// Conversation State
// ============================================================

async fn get_state(State(state): State<AppState>) -> Json<StateResponse> {
    Json(state.conversation.snapshot().into())
}

async fn stream_events(State(state): State<AppState>) -> impl IntoResponse {
    let (snapshot, rx) = state.conversation.subscribe();
    sse_stream(SseEvent::Init { state: snapshot }, rx)
}

// ============================================================
// User Intents
// ============================================================

async fn update_draft(
    State(state): State<AppState>,
    Json(req): Json<DraftRequest>,
) -> Result<Json<StateResponse>, AppError> {
    let updated = state.conversation.update_draft(req.text).await?;
    Ok(Json(updated.into()))
}

/// An empty body submits the stored draft; anything else must be a valid
/// `SubmitRequest`.
async fn submit(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<StateResponse>, AppError> {
    let req = if body.iter().all(u8::is_ascii_whitespace) {
        SubmitRequest::default()
    } else {
        serde_json::from_slice::<SubmitRequest>(&body)
            .map_err(|e| AppError::BadRequest(format!("invalid submit body: {e}")))?
    };
    let text = match req.text {
        Some(text) => text,
        None => state.conversation.snapshot().draft,
    };

    let updated = state.conversation.submit(text).await?;
    Ok(Json(updated.into()))
}

async fn attach_file(
    State(state): State<AppState>,
    Json(req): Json<AttachRequest>,
) -> Result<Json<StateResponse>, AppError> {
    let attachment =
        Attachment::from_file_name(&req.name).map_err(|e| AppError::BadRequest(e.to_string()))?;

    tracing::info!(file = %attachment.name, "File attached");
    let updated = state.conversation.attach_file(attachment).await?;
    Ok(Json(updated.into()))
}

async fn clear_attachment(State(state): State<AppState>) -> Result<Json<StateResponse>, AppError> {
    let updated = state.conversation.clear_attachment().await?;
    Ok(Json(updated.into()))
}

// ============================================================
// Version
// ============================================================

async fn get_version(State(state): State<AppState>) -> Json<VersionResponse> {
    Json(VersionResponse {
        version: env!("CARGO_PKG_VERSION"),
        model: state.model_id,
    })
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    Conflict(String),
    Unavailable(String),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Refused(refusal) => AppError::Conflict(refusal.to_string()),
            StoreError::Stopped => AppError::Unavailable(StoreError::Stopped.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
