pub mod config;
pub mod control;
pub mod http;
pub mod identity;
pub mod session;
pub mod stream;
pub mod timeline;

pub use config::Config;
pub use control::{ControlApi, ControlError, Notifier, StartOptions, CODE_ALREADY_ACTIVE};
pub use http::{create_router, AppState};
pub use identity::{IdentityProvider, StreamCredential};
pub use session::{
    LiveSession, MeetingLog, SessionController, StartGuard, TranscriptionState,
};
pub use stream::{ConnectionPhase, ServerMessage, StreamClient, StreamEvent};
pub use timeline::{merge, ParticipantEvent, ParticipantEventKind, TimelineItem, TranscriptSegment};
