//! Stamping new directives into a note at the current playback position.

use super::format::format_timestamp;
use super::parser::parse;
use super::segment::Action;

/// Result of inserting a stamp into note text.
#[derive(Debug, Clone, PartialEq)]
pub struct StampOutcome {
    /// The updated note text
    pub text: String,
    /// Byte offset just after the inserted stamp (and its trailing space)
    pub cursor: usize,
    /// The directive that was inserted
    pub directive: String,
    /// Whether the preceding directive gained an auto-jump to chain into the new one
    pub chained: bool,
}

/// Insert a `[at-(at+duration), 100%, 1.00x]` directive at `cursor`.
///
/// If the last complete directive before the cursor has no action and `at`
/// is earlier than its end time, it gains `, ->` so playback chains from it
/// into the new stamp instead of running past it. `cursor` is clamped to the
/// text and moved back to the nearest char boundary.
pub fn insert_stamp(text: &str, cursor: usize, at: f64, duration: f64) -> StampOutcome {
    let mut cursor = cursor.min(text.len());
    while !text.is_char_boundary(cursor) {
        cursor -= 1;
    }

    let start = at.max(0.0);
    let end = start + duration.max(0.001);
    let directive = format!(
        "[{}-{}, 100%, 1.00x]",
        format_timestamp(start),
        format_timestamp(end)
    );

    let mut updated = text.to_string();
    let mut chained = false;

    let previous = parse(&text[..cursor]).pop();
    if let Some(prev) = previous {
        if prev.action == Action::None && start < prev.end_time {
            // Replace the closing bracket of the previous directive
            let close = prev.span.end - 1;
            updated.replace_range(close..prev.span.end, ", ->]");
            cursor += ", ->".len();
            chained = true;
        }
    }

    updated.insert_str(cursor, &format!("{} ", directive));
    let new_cursor = cursor + directive.len() + 1;

    StampOutcome {
        text: updated,
        cursor: new_cursor,
        directive,
        chained,
    }
}
