use serde::{Deserialize, Serialize};

/// One attributed span of transcribed speech, as delivered by the stream.
/// Appended to the session's segment log, never mutated or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Stable identifier; de-dup/ordering key when timestamps tie.
    pub id: String,

    /// Meeting-relative start time in milliseconds.
    pub t_start_ms: u64,

    /// Resolved display name of the speaker, when the platform provides one.
    #[serde(default)]
    pub speaker_name: Option<String>,

    /// Raw speaker label from the caption source.
    #[serde(default)]
    pub speaker_label: Option<String>,

    pub text: String,
}

impl TranscriptSegment {
    /// Display name, falling back through the label fields.
    pub fn speaker(&self) -> &str {
        self.speaker_name
            .as_deref()
            .or(self.speaker_label.as_deref())
            .unwrap_or("Unknown speaker")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantEventKind {
    InitialRoster,
    Joined,
    Left,
    TranscriptionStarted,
    TranscriptionStopped,
    TranscriptionPaused,
    TranscriptionResumed,
}

/// A presence or transcription-state change. Append-only, same ownership as
/// [`TranscriptSegment`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantEvent {
    pub id: String,

    #[serde(rename = "event_type")]
    pub kind: ParticipantEventKind,

    pub participant_id: String,

    pub participant_name: String,

    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
}

/// Derived display value. Never persisted; the full ordered sequence is a
/// strict function of the segment and event logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "item", rename_all = "snake_case")]
pub enum TimelineItem {
    MeetingStarted {
        text: String,
        timestamp: u64,
        participant_ids: Vec<String>,
    },
    ParticipantEvent {
        event_type: ParticipantEventKind,
        participant_name: String,
        timestamp: u64,
    },
    Transcript {
        speaker: String,
        text: String,
        timestamp: u64,
    },
}

impl TimelineItem {
    pub fn timestamp(&self) -> u64 {
        match self {
            TimelineItem::MeetingStarted { timestamp, .. }
            | TimelineItem::ParticipantEvent { timestamp, .. }
            | TimelineItem::Transcript { timestamp, .. } => *timestamp,
        }
    }
}
