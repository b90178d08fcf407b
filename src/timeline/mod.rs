//! Timeline reconstruction
//!
//! Combines the two independently time-stamped event sources of a live
//! meeting (transcript segments and participant presence events) into one
//! deterministic, chronologically ordered sequence of display items.
//!
//! Everything here is pure: no I/O, no clocks, no mutation of inputs. The
//! rendered timeline is always a full recompute over the current logs.

mod merge;
mod types;

pub use merge::merge;
pub use types::{ParticipantEvent, ParticipantEventKind, TimelineItem, TranscriptSegment};
