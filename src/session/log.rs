use tokio::sync::Mutex;

use crate::timeline::{self, ParticipantEvent, TimelineItem, TranscriptSegment};

/// Append-only logs for one session. Segments and events are never mutated
/// or removed once pushed; the timeline is always a full recompute over a
/// snapshot of both.
#[derive(Default)]
pub struct MeetingLog {
    segments: Mutex<Vec<TranscriptSegment>>,
    events: Mutex<Vec<ParticipantEvent>>,
}

impl MeetingLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push_segment(&self, segment: TranscriptSegment) {
        self.segments.lock().await.push(segment);
    }

    pub async fn push_event(&self, event: ParticipantEvent) {
        self.events.lock().await.push(event);
    }

    pub async fn segments(&self) -> Vec<TranscriptSegment> {
        self.segments.lock().await.clone()
    }

    pub async fn events(&self) -> Vec<ParticipantEvent> {
        self.events.lock().await.clone()
    }

    pub async fn segment_count(&self) -> usize {
        self.segments.lock().await.len()
    }

    pub async fn event_count(&self) -> usize {
        self.events.lock().await.len()
    }

    /// Merged, ordered view of everything received so far.
    pub async fn timeline(&self) -> Vec<TimelineItem> {
        let segments = self.segments().await;
        let events = self.events().await;
        timeline::merge(&segments, &events)
    }
}
