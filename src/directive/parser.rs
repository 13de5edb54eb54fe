//! Directive parser.
//!
//! Turns annotated note text into an ordered list of [`Segment`]s. This is
//! the only place in the crate that knows the directive syntax:
//!
//! ```text
//! [H:MM:SS-H:MM:SS, VOL%, SPEEDx]
//! [H:MM:SS-H:MM:SS, VOL%, SPEEDx, ->]
//! [H:MM:SS-H:MM:SS, VOL%, SPEEDx, |N]
//! ```
//!
//! Hours take 1-2 digits, minutes exactly 2, seconds 1-2 with up to three
//! decimals. Anything that does not match (or matches but describes an
//! impossible window) is skipped silently.

use std::sync::OnceLock;

use regex::{Captures, Regex};
use tracing::{debug, trace};

use super::segment::{Action, Segment};

const DIRECTIVE_PATTERN: &str = concat!(
    r"\[(\d{1,2}):(\d{2}):(\d{1,2}(?:\.\d{1,3})?)",
    r"-(\d{1,2}):(\d{2}):(\d{1,2}(?:\.\d{1,3})?)",
    r",[ \t]*(\d+)%",
    r",[ \t]*([\d.]+)x",
    r"(?:,[ \t]*(->|\|\d+))?\]",
);

fn directive_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(DIRECTIVE_PATTERN).expect("directive pattern is valid"))
}

/// Parse every directive in `text`, in order of appearance.
///
/// Never fails: malformed directives are excluded from the output. The
/// returned segments carry dense `sequence_index` values starting at 0.
///
/// # Examples
/// ```
/// use notecue::directive::{parse, Action};
///
/// let segments = parse("intro [00:00:10-00:00:12, 80%, 1.25x, ->] outro");
/// assert_eq!(segments.len(), 1);
/// assert_eq!(segments[0].start_time, 10.0);
/// assert_eq!(segments[0].action, Action::AutoJump);
/// ```
pub fn parse(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();

    for caps in directive_regex().captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        match segment_from_captures(&caps, segments.len()) {
            Some(segment) => {
                trace!(
                    index = segment.sequence_index,
                    raw = %segment.raw,
                    "parsed directive"
                );
                segments.push(segment);
            }
            None => debug!(raw = whole.as_str(), "skipping malformed directive"),
        }
    }

    segments
}

fn segment_from_captures(caps: &Captures<'_>, sequence_index: usize) -> Option<Segment> {
    let whole = caps.get(0)?;

    let start_time = seconds_from(caps, 1)?;
    let end_time = seconds_from(caps, 4)?;
    if start_time >= end_time {
        return None;
    }

    let volume: u32 = caps.get(7)?.as_str().parse().ok()?;
    if volume > 100 {
        return None;
    }

    let speed: f64 = caps.get(8)?.as_str().parse().ok()?;
    if !speed.is_finite() || speed <= 0.0 {
        return None;
    }

    let action = match caps.get(9).map(|m| m.as_str()) {
        None => Action::None,
        Some("->") => Action::AutoJump,
        Some(pause) => {
            let seconds: u32 = pause.strip_prefix('|')?.parse().ok()?;
            if seconds == 0 {
                return None;
            }
            Action::PauseFor(seconds)
        }
    };

    Some(Segment {
        start_time,
        end_time,
        volume: volume as u8,
        speed,
        action,
        sequence_index,
        raw: whole.as_str().to_string(),
        span: whole.range(),
    })
}

/// Convert the H/M/S capture triple starting at `first` to seconds.
fn seconds_from(caps: &Captures<'_>, first: usize) -> Option<f64> {
    let hours: f64 = caps.get(first)?.as_str().parse().ok()?;
    let minutes: f64 = caps.get(first + 1)?.as_str().parse().ok()?;
    let seconds: f64 = caps.get(first + 2)?.as_str().parse().ok()?;
    Some(hours * 3600.0 + minutes * 60.0 + seconds)
}

/// Parse results cached by text identity.
///
/// Re-parsing is skipped when the text is unchanged, so repeated updates
/// from an editor that did not actually change the note reuse the segments.
#[derive(Debug, Default)]
pub struct ParseCache {
    text: Option<String>,
    segments: Vec<Segment>,
}

impl ParseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the source text, re-parsing only when it changed.
    ///
    /// Returns `true` if the segment list was rebuilt.
    pub fn update(&mut self, text: &str) -> bool {
        if self.text.as_deref() == Some(text) {
            return false;
        }
        self.segments = parse(text);
        self.text = Some(text.to_string());
        true
    }

    /// The current segment list, in appearance order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Look up a segment by its sequence index.
    pub fn get(&self, sequence_index: usize) -> Option<&Segment> {
        self.segments.get(sequence_index)
    }

    /// The text the current segments were parsed from.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}
