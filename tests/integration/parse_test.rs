//! Directive parsing against note fixtures

use notecue::directive::{parse, segment_at_offset, Action, ActivationPoint, SegmentSummary};

use crate::helpers::load_fixture;

#[test]
fn lecture_fixture_skips_invalid_window() {
    let segments = parse(&load_fixture("lecture.md"));

    assert_eq!(segments.len(), 3);
    let starts: Vec<f64> = segments.iter().map(|s| s.start_time).collect();
    assert_eq!(starts, vec![5.0, 20.0, 45.0]);
    let indices: Vec<usize> = segments.iter().map(|s| s.sequence_index).collect();
    assert_eq!(indices, vec![0, 1, 2]);
    assert_eq!(segments[1].action, Action::PauseFor(2));
}

#[test]
fn chained_fixture_actions() {
    let segments = parse(&load_fixture("chained.md"));
    let actions: Vec<Action> = segments.iter().map(|s| s.action).collect();
    assert_eq!(actions, vec![Action::AutoJump, Action::AutoJump, Action::None]);
    assert_eq!(segments[1].speed, 1.25);
}

#[test]
fn spans_point_back_into_the_text() {
    let text = load_fixture("chained.md");
    let segments = parse(&text);
    for segment in &segments {
        assert_eq!(&text[segment.span.clone()], segment.raw);
    }

    let second = &segments[1];
    assert_eq!(
        segment_at_offset(&segments, second.span.start).map(|(s, p)| (s.sequence_index, p)),
        Some((1, ActivationPoint::Start))
    );
    assert_eq!(
        segment_at_offset(&segments, second.span.end - 1).map(|(s, p)| (s.sequence_index, p)),
        Some((1, ActivationPoint::End))
    );
}

#[test]
fn canonical_rendering_parses_back_to_same_directive() {
    let segments = parse(&load_fixture("lecture.md"));
    for segment in &segments {
        let reparsed = parse(&segment.to_directive());
        assert_eq!(reparsed.len(), 1);
        assert!(reparsed[0].same_directive(segment, 0.001));
    }
}

#[test]
fn summaries_serialize_for_listings() {
    let segments = parse(&load_fixture("chained.md"));
    let summaries: Vec<SegmentSummary> = segments.iter().map(SegmentSummary::from).collect();
    let json = serde_json::to_value(&summaries).unwrap();

    assert_eq!(json[1]["start_formatted"], "00:01:00");
    assert_eq!(json[1]["volume"], 70);
    assert_eq!(json[2]["duration"], 3.0);
}
