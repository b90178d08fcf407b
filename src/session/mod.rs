//! Live session management
//!
//! This module owns the transcription lifecycle for one attached meeting:
//! - the on/off state machine reconciled against stream evidence
//! - the shared duplicate-start guard
//! - the append-only segment/event logs feeding the timeline merge
//! - the `LiveSession` bundle wiring identity → stream → controller

mod controller;
mod guard;
mod log;
mod session;

pub use controller::{
    SessionController, SessionSnapshot, TranscriptionState, AUTO_START_DELAY, VERIFICATION_WINDOW,
};
pub use guard::{StartGuard, START_GUARD_TTL};
pub use log::MeetingLog;
pub use session::{LiveSession, LiveSessionStatus};
