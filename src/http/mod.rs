//! HTTP API server for controlling live meeting sessions:
//! - POST /meetings/:id/attach - Attach the assistant to a meeting
//! - POST /meetings/:id/detach - Detach and tear the session down
//! - POST /meetings/:id/transcription/start - Manual start
//! - POST /meetings/:id/transcription/stop - Manual stop
//! - GET /meetings/:id/status - Session + connection snapshot
//! - GET /meetings/:id/timeline - Merged, ordered timeline
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
