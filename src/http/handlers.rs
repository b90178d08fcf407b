use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Serialize;
use tracing::{error, info};

use super::state::AppState;
use crate::session::LiveSession;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct AttachResponse {
    pub meeting_id: String,
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /meetings/:meeting_id/attach
/// Attach the assistant to a live meeting
pub async fn attach_meeting(
    State(state): State<AppState>,
    Path(meeting_id): Path<String>,
) -> impl IntoResponse {
    info!("Attaching to meeting: {}", meeting_id);

    // Check if already attached
    {
        let sessions = state.sessions.read().await;
        if sessions.contains_key(&meeting_id) {
            return (
                StatusCode::CONFLICT,
                Json(ErrorResponse {
                    error: format!("Meeting {} is already attached", meeting_id),
                }),
            )
                .into_response();
        }
    }

    let session = match LiveSession::attach(
        meeting_id.clone(),
        state.stream.clone(),
        Arc::clone(&state.identity),
        Arc::clone(&state.control),
        Arc::clone(&state.notifier),
        state.guard.clone(),
    )
    .await
    {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to attach session: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Failed to attach session: {}", e),
                }),
            )
                .into_response();
        }
    };

    {
        let mut sessions = state.sessions.write().await;
        sessions.insert(meeting_id.clone(), session);
    }

    info!("Attached successfully to meeting: {}", meeting_id);

    (
        StatusCode::OK,
        Json(AttachResponse {
            meeting_id: meeting_id.clone(),
            status: "attached".to_string(),
            message: format!("Assistant attached to meeting {}", meeting_id),
        }),
    )
        .into_response()
}

/// POST /meetings/:meeting_id/detach
/// Detach from a meeting and tear the session down
pub async fn detach_meeting(
    State(state): State<AppState>,
    Path(meeting_id): Path<String>,
) -> impl IntoResponse {
    info!("Detaching from meeting: {}", meeting_id);

    let session = {
        let mut sessions = state.sessions.write().await;
        sessions.remove(&meeting_id)
    };

    match session {
        Some(session) => {
            session.detach().await;
            (
                StatusCode::OK,
                Json(AttachResponse {
                    meeting_id: meeting_id.clone(),
                    status: "detached".to_string(),
                    message: "Assistant detached".to_string(),
                }),
            )
                .into_response()
        }
        None => not_attached(&meeting_id),
    }
}

/// POST /meetings/:meeting_id/transcription/start
/// Manually request transcription start
pub async fn start_transcription(
    State(state): State<AppState>,
    Path(meeting_id): Path<String>,
) -> impl IntoResponse {
    let sessions = state.sessions.read().await;

    match sessions.get(&meeting_id) {
        Some(session) => {
            session.controller().request_start().await;
            (StatusCode::OK, Json(session.status().await)).into_response()
        }
        None => not_attached(&meeting_id),
    }
}

/// POST /meetings/:meeting_id/transcription/stop
/// Manually request transcription stop
pub async fn stop_transcription(
    State(state): State<AppState>,
    Path(meeting_id): Path<String>,
) -> impl IntoResponse {
    let sessions = state.sessions.read().await;

    match sessions.get(&meeting_id) {
        Some(session) => {
            session.controller().request_stop().await;
            (StatusCode::OK, Json(session.status().await)).into_response()
        }
        None => not_attached(&meeting_id),
    }
}

/// GET /meetings/:meeting_id/status
/// Get the session + connection snapshot
pub async fn get_meeting_status(
    State(state): State<AppState>,
    Path(meeting_id): Path<String>,
) -> impl IntoResponse {
    let sessions = state.sessions.read().await;

    match sessions.get(&meeting_id) {
        Some(session) => (StatusCode::OK, Json(session.status().await)).into_response(),
        None => not_attached(&meeting_id),
    }
}

/// GET /meetings/:meeting_id/timeline
/// Get the merged, ordered timeline accumulated so far
pub async fn get_meeting_timeline(
    State(state): State<AppState>,
    Path(meeting_id): Path<String>,
) -> impl IntoResponse {
    let sessions = state.sessions.read().await;

    match sessions.get(&meeting_id) {
        Some(session) => (StatusCode::OK, Json(session.timeline().await)).into_response(),
        None => not_attached(&meeting_id),
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

fn not_attached(meeting_id: &str) -> axum::response::Response {
    error!("Meeting {} not attached", meeting_id);
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("Meeting {} not attached", meeting_id),
        }),
    )
        .into_response()
}
