//! End-to-end engine scenarios on the manual clock

use notecue::directive::ActivationPoint;
use notecue::engine::{EngineConfig, EngineEvent, RestorePolicy, SegmentPhase};
use notecue::player::Player;

use crate::helpers::{load_fixture, Scenario};

fn count(scenario: &Scenario, pred: impl Fn(&EngineEvent) -> bool) -> usize {
    scenario.events().iter().filter(|e| pred(e)).count()
}

// ============================================================================
// Straight playback
// ============================================================================

#[test]
fn lecture_plays_through_every_directive_once() {
    let mut s = Scenario::new(&load_fixture("lecture.md"));
    s.poll();
    s.play_for(50_000);

    assert_eq!(s.entered(), vec![0, 1, 2]);
    assert_eq!(count(&s, |e| matches!(e, EngineEvent::Exited { .. })), 3);
    assert_eq!(count(&s, |e| matches!(e, EngineEvent::PauseStarted { seconds: 2, .. })), 1);
    assert_eq!(count(&s, |e| matches!(e, EngineEvent::PauseEnded { seconds: 2 })), 1);
    assert_eq!(count(&s, |e| matches!(e, EngineEvent::ManualSeek { .. })), 0);

    assert_eq!(s.engine.phase(), SegmentPhase::Idle);
    assert_eq!(s.engine.player().volume().unwrap(), 100);
    assert_eq!(s.engine.player().playback_rate().unwrap(), 1.0);
    assert!(s.position() > 55.0);
}

#[test]
fn settings_apply_only_inside_the_window() {
    let mut s = Scenario::new(&load_fixture("lecture.md"));
    s.user_seek(4.5);
    s.poll();
    assert_eq!(s.engine.player().volume().unwrap(), 100);

    s.play_for(1_000);
    assert_eq!(s.engine.player().volume().unwrap(), 40);
    assert_eq!(s.engine.player().playback_rate().unwrap(), 1.5);
    assert_eq!(s.engine.active_segment().map(|seg| seg.sequence_index), Some(0));
}

// ============================================================================
// Auto-jump chains
// ============================================================================

#[test]
fn chained_note_jumps_between_directives() {
    let mut s = Scenario::new(&load_fixture("chained.md"));
    s.poll();
    s.play_for(10_000);

    let jumps: Vec<(usize, usize)> = s
        .events()
        .into_iter()
        .filter_map(|e| match e {
            EngineEvent::AutoJumped { from, to, .. } => Some((from, to)),
            _ => None,
        })
        .collect();
    assert_eq!(jumps, vec![(0, 1), (1, 2)]);
    assert_eq!(s.entered(), vec![0, 1, 2]);
    assert_eq!(count(&s, |e| matches!(e, EngineEvent::ManualSeek { .. })), 0);
    assert!(s.position() > 153.0);
    assert_eq!(s.engine.player().volume().unwrap(), 100);
}

#[test]
fn chain_restores_settings_from_before_the_first_entry() {
    let config = EngineConfig {
        restore_policy: RestorePolicy::PriorSettings,
        ..EngineConfig::default()
    };
    let mut s = Scenario::with_config(&load_fixture("chained.md"), config);
    s.engine.player_mut().user_adjust(60, 0.75);
    s.poll();
    s.play_for(12_000);

    assert_eq!(s.entered(), vec![0, 1, 2]);
    assert_eq!(s.engine.player().volume().unwrap(), 60);
    assert_eq!(s.engine.player().playback_rate().unwrap(), 0.75);
}

// ============================================================================
// User interaction
// ============================================================================

#[test]
fn seeking_back_makes_earlier_directives_eligible() {
    let mut s = Scenario::new(&load_fixture("lecture.md"));
    s.user_seek(46.0);
    s.poll();
    s.play_for(500);
    assert_eq!(s.engine.state().last_consumed_index, 2);

    s.user_seek(22.0);
    s.play_for(100);

    assert_eq!(s.entered(), vec![2, 1]);
    assert!(s
        .events()
        .iter()
        .any(|e| matches!(e, EngineEvent::ManualSeek { watermark: 0, .. })));
}

#[test]
fn clicking_the_end_of_a_chained_directive_jumps_onward() {
    let text = load_fixture("chained.md");
    let mut s = Scenario::new(&text);
    s.poll();

    let offset = text.find("00:01:02").expect("fixture has second directive") + 1;
    let now = s.now();
    let hit = s.engine.activate_at_offset(offset, now).unwrap();
    assert_eq!(hit, Some((1, ActivationPoint::End)));
    assert_eq!(s.position(), 62.0);
    assert_eq!(s.engine.phase(), SegmentPhase::ExplicitlyEntered);
    assert!(s.engine.auto_jump_status(s.now()).is_some());

    s.play_for(200);
    assert!(s
        .events()
        .iter()
        .any(|e| matches!(e, EngineEvent::AutoJumped { from: 1, to: 2, .. })));
    assert_eq!(s.engine.active_segment().map(|seg| seg.sequence_index), Some(2));
}

#[test]
fn switching_video_resets_everything() {
    let mut s = Scenario::new(&load_fixture("chained.md"));
    assert!(s.engine.set_video("lecture-4"));
    s.user_seek(2.5);
    s.poll();
    assert!(s.engine.auto_jump_status(s.now()).is_some());

    assert!(!s.engine.set_video("lecture-4"));
    assert!(s.engine.active_segment().is_some());

    assert!(s.engine.set_video("lecture-5"));
    assert!(s.engine.active_segment().is_none());
    assert!(s.engine.auto_jump_status(s.now()).is_none());
    assert_eq!(s.engine.state().last_consumed_index, -1);
    assert_eq!(s.engine.segments().len(), 3);
}
