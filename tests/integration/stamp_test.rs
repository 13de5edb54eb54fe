//! Stamping directives into note fixtures

use notecue::directive::{insert_stamp, parse, Action};

use crate::helpers::load_fixture;

#[test]
fn stamp_after_last_directive_is_plain() {
    let text = load_fixture("lecture.md");
    let outcome = insert_stamp(&text, text.len(), 60.0, 5.0);

    assert!(!outcome.chained);
    assert_eq!(outcome.directive, "[00:01:00-00:01:05, 100%, 1.00x]");
    assert!(outcome.text.starts_with(&text));

    let segments = parse(&outcome.text);
    assert_eq!(segments.len(), 4);
    assert_eq!(segments[3].start_time, 60.0);
    assert_eq!(segments[2].action, Action::None);
}

#[test]
fn earlier_stamp_chains_from_previous_directive() {
    let text = load_fixture("chained.md");
    let outcome = insert_stamp(&text, text.len(), 100.0, 4.0);

    assert!(outcome.chained);
    let segments = parse(&outcome.text);
    assert_eq!(segments.len(), 4);
    assert_eq!(segments[2].action, Action::AutoJump);
    assert_eq!(segments[2].raw, "[00:02:30-00:02:33, 100%, 1.00x, ->]");
    assert_eq!(segments[3].start_time, 100.0);
    assert_eq!(segments[3].end_time, 104.0);
}

#[test]
fn stamp_cursor_lands_after_inserted_text() {
    let text = load_fixture("lecture.md");
    let cursor = text.find("Key definition").expect("fixture has paragraph");
    let outcome = insert_stamp(&text, cursor, 17.0, 2.0);

    assert!(!outcome.chained);
    let inserted = &outcome.text[cursor..outcome.cursor];
    assert_eq!(inserted, "[00:00:17-00:00:19, 100%, 1.00x] ");
    assert!(outcome.text[outcome.cursor..].starts_with("Key definition"));
}
