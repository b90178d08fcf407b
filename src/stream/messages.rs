use serde::{Deserialize, Serialize};

use crate::timeline::{ParticipantEvent, TranscriptSegment};

/// Control messages sent client → server.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    #[serde(rename = "subscribe")]
    Subscribe { payload: SubscribePayload },
}

#[derive(Debug, Clone, Serialize)]
pub struct SubscribePayload {
    #[serde(rename = "meetingId")]
    pub meeting_id: String,
}

impl ClientMessage {
    pub fn subscribe(meeting_id: impl Into<String>) -> Self {
        ClientMessage::Subscribe {
            payload: SubscribePayload {
                meeting_id: meeting_id.into(),
            },
        }
    }
}

/// Messages received server → client. Unrecognized `type` values decode to
/// `Unknown` and are ignored by contract, never an error.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    #[serde(rename = "connected")]
    Connected,

    #[serde(rename = "transcript.segment")]
    TranscriptSegment { data: SegmentData },

    #[serde(rename = "participant.event")]
    ParticipantEvent { data: EventData },

    #[serde(rename = "meeting.status")]
    MeetingStatus { data: StatusData },

    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SegmentData {
    pub segment: TranscriptSegment,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventData {
    pub event: ParticipantEvent,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusData {
    pub status: MeetingStatus,
}

/// Platform-reported transcription status for the meeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeetingStatus {
    #[serde(rename = "rtms_started")]
    RtmsStarted,
    #[serde(rename = "rtms_stopped")]
    RtmsStopped,
}
