use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::handlers;
use super::state::AppState;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Session lifecycle
        .route("/meetings/:meeting_id/attach", post(handlers::attach_meeting))
        .route("/meetings/:meeting_id/detach", post(handlers::detach_meeting))
        // Transcription control
        .route(
            "/meetings/:meeting_id/transcription/start",
            post(handlers::start_transcription),
        )
        .route(
            "/meetings/:meeting_id/transcription/stop",
            post(handlers::stop_transcription),
        )
        // Meeting queries
        .route(
            "/meetings/:meeting_id/status",
            get(handlers::get_meeting_status),
        )
        .route(
            "/meetings/:meeting_id/timeline",
            get(handlers::get_meeting_timeline),
        )
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
