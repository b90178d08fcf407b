use std::collections::HashSet;

use super::types::{ParticipantEvent, ParticipantEventKind, TimelineItem, TranscriptSegment};

/// Legacy roster rule: `joined` events within this window of the earliest
/// join count as the initial roster when no `initial_roster` events exist.
const LEGACY_ROSTER_WINDOW_MS: u64 = 60_000;

/// Merge transcript segments and participant events into a single ordered
/// timeline.
///
/// Roster grouping prefers explicit `initial_roster` events; older meetings
/// only emit `joined`, so the fallback groups joins inside the 60 s window.
/// The result is sorted ascending by timestamp with a stable sort, so input
/// order decides ties.
pub fn merge(segments: &[TranscriptSegment], events: &[ParticipantEvent]) -> Vec<TimelineItem> {
    let roster: Vec<&ParticipantEvent> = events
        .iter()
        .filter(|e| e.kind == ParticipantEventKind::InitialRoster)
        .collect();

    let legacy = roster.is_empty();
    let (roster, window) = if legacy {
        legacy_roster(events)
    } else {
        (roster, None)
    };

    let mut items = Vec::with_capacity(segments.len() + events.len() + 1);

    let roster_ids: HashSet<&str> = roster.iter().map(|e| e.participant_id.as_str()).collect();

    if !roster.is_empty() {
        let timestamp = roster.iter().map(|e| e.timestamp).min().unwrap_or(0);
        let names: Vec<&str> = roster.iter().map(|e| e.participant_name.as_str()).collect();
        let participant_ids = roster.iter().map(|e| e.participant_id.clone()).collect();

        items.push(TimelineItem::MeetingStarted {
            text: meeting_started_text(&names),
            timestamp,
            participant_ids,
        });
    }

    for segment in segments {
        items.push(TimelineItem::Transcript {
            speaker: segment.speaker().to_string(),
            text: segment.text.clone(),
            timestamp: segment.t_start_ms,
        });
    }

    for event in events {
        if event.kind == ParticipantEventKind::InitialRoster {
            continue;
        }

        // Under the legacy fallback the roster joins would otherwise show up
        // twice: once inside the meeting-started item and once standalone.
        if let Some(window_end) = window {
            if event.kind == ParticipantEventKind::Joined
                && event.timestamp <= window_end
                && roster_ids.contains(event.participant_id.as_str())
            {
                continue;
            }
        }

        items.push(TimelineItem::ParticipantEvent {
            event_type: event.kind,
            participant_name: event.participant_name.clone(),
            timestamp: event.timestamp,
        });
    }

    // Stable sort: ties keep input order, which keeps the merge deterministic.
    items.sort_by_key(TimelineItem::timestamp);
    items
}

/// All `joined` events within the window of the earliest join, plus the end
/// of that window (for the double-representation exclusion above).
fn legacy_roster(events: &[ParticipantEvent]) -> (Vec<&ParticipantEvent>, Option<u64>) {
    let first_join = events
        .iter()
        .filter(|e| e.kind == ParticipantEventKind::Joined)
        .map(|e| e.timestamp)
        .min();

    match first_join {
        Some(first) => {
            let window_end = first.saturating_add(LEGACY_ROSTER_WINDOW_MS);
            let roster = events
                .iter()
                .filter(|e| e.kind == ParticipantEventKind::Joined && e.timestamp <= window_end)
                .collect();
            (roster, Some(window_end))
        }
        None => (Vec::new(), None),
    }
}

fn meeting_started_text(names: &[&str]) -> String {
    match names.len() {
        0 => "Meeting started".to_string(),
        1..=3 => format!("Meeting started with {}", names.join(", ")),
        n => format!(
            "Meeting started with {}, {}, and {} others",
            names[0],
            names[1],
            n - 2
        ),
    }
}
