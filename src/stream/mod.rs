//! Streaming transport client
//!
//! One persistent WebSocket per active meeting: subscribe on open, decode
//! inbound frames into a closed set of typed events, dispatch them to the
//! session consumer, and reconnect unconditionally after any close.

pub mod client;
pub mod messages;

pub use client::{ConnectionPhase, StreamClient, StreamError, StreamEvent};
pub use messages::{ClientMessage, MeetingStatus, ServerMessage, SubscribePayload};
