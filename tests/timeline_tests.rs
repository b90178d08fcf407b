use meetstream::timeline::{
    merge, ParticipantEvent, ParticipantEventKind, TimelineItem, TranscriptSegment,
};

fn segment(id: &str, t_start_ms: u64, speaker: &str, text: &str) -> TranscriptSegment {
    TranscriptSegment {
        id: id.to_string(),
        t_start_ms,
        speaker_name: Some(speaker.to_string()),
        speaker_label: None,
        text: text.to_string(),
    }
}

fn event(
    id: &str,
    kind: ParticipantEventKind,
    participant: &str,
    name: &str,
    timestamp: u64,
) -> ParticipantEvent {
    ParticipantEvent {
        id: id.to_string(),
        kind,
        participant_id: participant.to_string(),
        participant_name: name.to_string(),
        timestamp,
    }
}

fn joined(id: &str, participant: &str, name: &str, timestamp: u64) -> ParticipantEvent {
    event(id, ParticipantEventKind::Joined, participant, name, timestamp)
}

fn roster(id: &str, participant: &str, name: &str, timestamp: u64) -> ParticipantEvent {
    event(
        id,
        ParticipantEventKind::InitialRoster,
        participant,
        name,
        timestamp,
    )
}

#[test]
fn test_merge_empty_inputs() {
    assert!(merge(&[], &[]).is_empty());
}

#[test]
fn test_meeting_started_single_name() {
    let events = vec![roster("e1", "p1", "Ada", 1000)];
    let items = merge(&[], &events);

    assert_eq!(items.len(), 1);
    match &items[0] {
        TimelineItem::MeetingStarted {
            text,
            timestamp,
            participant_ids,
        } => {
            assert_eq!(text, "Meeting started with Ada");
            assert_eq!(*timestamp, 1000);
            assert_eq!(participant_ids, &vec!["p1".to_string()]);
        }
        other => panic!("expected MeetingStarted, got {:?}", other),
    }
}

#[test]
fn test_meeting_started_three_names() {
    let events = vec![
        roster("e1", "p1", "Ada", 1000),
        roster("e2", "p2", "Grace", 1100),
        roster("e3", "p3", "Edsger", 1200),
    ];
    let items = merge(&[], &events);

    assert_eq!(items.len(), 1);
    match &items[0] {
        TimelineItem::MeetingStarted { text, timestamp, .. } => {
            assert_eq!(text, "Meeting started with Ada, Grace, Edsger");
            assert_eq!(*timestamp, 1000);
        }
        other => panic!("expected MeetingStarted, got {:?}", other),
    }
}

#[test]
fn test_meeting_started_five_names_truncates() {
    let events = vec![
        roster("e1", "p1", "Ada", 1000),
        roster("e2", "p2", "Grace", 1100),
        roster("e3", "p3", "Edsger", 1200),
        roster("e4", "p4", "Barbara", 1300),
        roster("e5", "p5", "Donald", 1400),
    ];
    let items = merge(&[], &events);

    match &items[0] {
        TimelineItem::MeetingStarted { text, .. } => {
            assert_eq!(text, "Meeting started with Ada, Grace, and 3 others");
        }
        other => panic!("expected MeetingStarted, got {:?}", other),
    }
}

#[test]
fn test_legacy_fallback_window_membership() {
    // No initial_roster events: joins within 60s of the first join form the
    // roster; a join at 60001ms past the first does not.
    let events = vec![
        joined("e1", "p1", "Ada", 10_000),
        joined("e2", "p2", "Grace", 40_000),
        joined("e3", "p3", "Edsger", 70_000),  // 10_000 + 60_000 boundary: in
        joined("e4", "p4", "Barbara", 70_001), // one past the window: out
    ];
    let items = merge(&[], &events);

    assert_eq!(items.len(), 2);
    match &items[0] {
        TimelineItem::MeetingStarted {
            text,
            timestamp,
            participant_ids,
        } => {
            assert_eq!(text, "Meeting started with Ada, Grace, Edsger");
            assert_eq!(*timestamp, 10_000);
            assert_eq!(
                participant_ids,
                &vec!["p1".to_string(), "p2".to_string(), "p3".to_string()]
            );
        }
        other => panic!("expected MeetingStarted, got {:?}", other),
    }
    match &items[1] {
        TimelineItem::ParticipantEvent {
            event_type,
            participant_name,
            timestamp,
        } => {
            assert_eq!(*event_type, ParticipantEventKind::Joined);
            assert_eq!(participant_name, "Barbara");
            assert_eq!(*timestamp, 70_001);
        }
        other => panic!("expected standalone Joined, got {:?}", other),
    }
}

#[test]
fn test_modern_roster_does_not_swallow_joins() {
    // With explicit initial_roster events, later joins always appear as
    // standalone items, even inside the first minute.
    let events = vec![
        roster("e1", "p1", "Ada", 1000),
        joined("e2", "p2", "Grace", 2000),
    ];
    let items = merge(&[], &events);

    assert_eq!(items.len(), 2);
    assert!(matches!(items[0], TimelineItem::MeetingStarted { .. }));
    assert!(matches!(
        &items[1],
        TimelineItem::ParticipantEvent {
            event_type: ParticipantEventKind::Joined,
            ..
        }
    ));
}

#[test]
fn test_legacy_rejoin_after_window_still_appears() {
    // The same participant rejoining after the window is a real event.
    let events = vec![
        joined("e1", "p1", "Ada", 0),
        event("e2", ParticipantEventKind::Left, "p1", "Ada", 30_000),
        joined("e3", "p1", "Ada", 120_000),
    ];
    let items = merge(&[], &events);

    assert_eq!(items.len(), 3);
    assert!(matches!(items[0], TimelineItem::MeetingStarted { .. }));
    match &items[2] {
        TimelineItem::ParticipantEvent {
            event_type,
            timestamp,
            ..
        } => {
            assert_eq!(*event_type, ParticipantEventKind::Joined);
            assert_eq!(*timestamp, 120_000);
        }
        other => panic!("expected rejoin, got {:?}", other),
    }
}

#[test]
fn test_transcript_speaker_fallback() {
    let mut seg = segment("s1", 5000, "Ada", "hello");
    seg.speaker_name = None;
    seg.speaker_label = Some("Speaker 1".to_string());

    let unlabeled = TranscriptSegment {
        id: "s2".to_string(),
        t_start_ms: 6000,
        speaker_name: None,
        speaker_label: None,
        text: "anyone there?".to_string(),
    };

    let items = merge(&[seg, unlabeled], &[]);
    assert_eq!(items.len(), 2);
    match (&items[0], &items[1]) {
        (
            TimelineItem::Transcript { speaker: s1, .. },
            TimelineItem::Transcript { speaker: s2, .. },
        ) => {
            assert_eq!(s1, "Speaker 1");
            assert_eq!(s2, "Unknown speaker");
        }
        other => panic!("expected two transcripts, got {:?}", other),
    }
}

#[test]
fn test_merge_sorts_ascending_for_any_input_order() {
    let segments = vec![
        segment("s1", 90_000, "Ada", "late remark"),
        segment("s2", 15_000, "Grace", "early remark"),
    ];
    let events = vec![
        joined("e2", "p2", "Grace", 5_000),
        joined("e1", "p1", "Ada", 1_000),
        event("e3", ParticipantEventKind::Left, "p2", "Grace", 80_000),
    ];

    let items = merge(&segments, &events);
    let timestamps: Vec<u64> = items.iter().map(|i| i.timestamp()).collect();
    let mut sorted = timestamps.clone();
    sorted.sort();
    assert_eq!(timestamps, sorted);

    // Reversed segment order: same timestamps, still sorted.
    let segments_rev: Vec<_> = segments.iter().rev().cloned().collect();
    let items_rev = merge(&segments_rev, &events);
    let timestamps_rev: Vec<u64> = items_rev.iter().map(|i| i.timestamp()).collect();
    assert_eq!(timestamps_rev, sorted);
}

#[test]
fn test_merge_is_deterministic_and_idempotent() {
    let segments = vec![
        segment("s1", 20_000, "Ada", "first"),
        segment("s2", 30_000, "Grace", "second"),
    ];
    let events = vec![
        joined("e1", "p1", "Ada", 1_000),
        joined("e2", "p2", "Grace", 2_000),
        event(
            "e3",
            ParticipantEventKind::TranscriptionStarted,
            "p1",
            "Ada",
            15_000,
        ),
    ];

    let first = merge(&segments, &events);
    let second = merge(&segments, &events);
    assert_eq!(first, second);

    // Inputs are untouched.
    assert_eq!(segments.len(), 2);
    assert_eq!(events.len(), 3);
    assert_eq!(segments[0].id, "s1");
    assert_eq!(events[2].kind, ParticipantEventKind::TranscriptionStarted);
}

#[test]
fn test_ties_keep_input_order() {
    let segments = vec![
        segment("s1", 10_000, "Ada", "a"),
        segment("s2", 10_000, "Grace", "b"),
    ];
    let items = merge(&segments, &[]);

    match (&items[0], &items[1]) {
        (
            TimelineItem::Transcript { text: t1, .. },
            TimelineItem::Transcript { text: t2, .. },
        ) => {
            assert_eq!(t1, "a");
            assert_eq!(t2, "b");
        }
        other => panic!("expected two transcripts, got {:?}", other),
    }
}
