//! Segment types produced by the directive parser.
//!
//! A segment is one parsed directive: a time window with the volume, speed
//! and optional action the player should use while the playhead is inside it.

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use super::format::format_timestamp;

/// What a segment does beyond applying its volume and speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind", content = "seconds")]
pub enum Action {
    /// Only volume and speed are applied
    None,
    /// Jump to the next segment (in appearance order) at the end of this one
    AutoJump,
    /// Pause playback for the given number of seconds on entry
    PauseFor(u32),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::None => write!(f, "none"),
            Action::AutoJump => write!(f, "->"),
            Action::PauseFor(seconds) => write!(f, "|{}", seconds),
        }
    }
}

/// Volume and speed pair applied to (or restored on) the player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSettings {
    /// Volume, 0-100
    pub volume: u8,
    /// Playback rate multiplier (1.0 = normal)
    pub speed: f64,
}

impl PlaybackSettings {
    pub fn new(volume: u8, speed: f64) -> Self {
        Self { volume, speed }
    }
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            volume: 100,
            speed: 1.0,
        }
    }
}

impl fmt::Display for PlaybackSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "volume {}%, speed {:.2}x", self.volume, self.speed)
    }
}

/// One parsed time-coded directive.
///
/// Segments are immutable once parsed and identified by their source span.
/// `sequence_index` is the order of appearance in the note, which is the
/// priority order; it is never re-sorted by time.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Window start in seconds
    pub start_time: f64,
    /// Window end in seconds (always greater than `start_time`)
    pub end_time: f64,
    /// Volume to apply, 0-100
    pub volume: u8,
    /// Playback rate to apply
    pub speed: f64,
    /// Action to run on entry
    pub action: Action,
    /// 0-based position of appearance in the source text
    pub sequence_index: usize,
    /// The matched directive text
    pub raw: String,
    /// Byte range of `raw` inside the source text
    pub span: Range<usize>,
}

impl Segment {
    /// Whether `time` falls inside the window, widened by `tolerance` on both ends.
    pub fn contains(&self, time: f64, tolerance: f64) -> bool {
        time >= self.start_time - tolerance && time <= self.end_time + tolerance
    }

    /// Length of the window in seconds.
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// The volume/speed pair this segment applies.
    pub fn settings(&self) -> PlaybackSettings {
        PlaybackSettings::new(self.volume, self.speed)
    }

    /// Whether `other` describes the same directive.
    ///
    /// Times and speed are compared within `tolerance`; volume and action
    /// must match exactly. Position in the text is not part of the
    /// comparison, so an edit that only moves a directive keeps it active.
    pub fn same_directive(&self, other: &Segment, tolerance: f64) -> bool {
        (self.start_time - other.start_time).abs() <= tolerance
            && (self.end_time - other.end_time).abs() <= tolerance
            && (self.speed - other.speed).abs() <= tolerance
            && self.volume == other.volume
            && self.action == other.action
    }

    /// Render the canonical directive text for this segment.
    pub fn to_directive(&self) -> String {
        let action = match self.action {
            Action::None => String::new(),
            action => format!(", {}", action),
        };
        format!(
            "[{}-{}, {}%, {:.2}x{}]",
            format_timestamp(self.start_time),
            format_timestamp(self.end_time),
            self.volume,
            self.speed,
            action
        )
    }

    /// Short label used in notifications and logs.
    pub fn label(&self) -> String {
        format!(
            "#{} [{}-{}]",
            self.sequence_index,
            format_timestamp(self.start_time),
            format_timestamp(self.end_time)
        )
    }
}

/// Serializable view of a segment for listings and timeline marks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentSummary {
    pub index: usize,
    pub start: f64,
    pub end: f64,
    pub duration: f64,
    pub volume: u8,
    pub speed: f64,
    pub action: Action,
    pub start_formatted: String,
    pub raw: String,
}

impl From<&Segment> for SegmentSummary {
    fn from(segment: &Segment) -> Self {
        Self {
            index: segment.sequence_index,
            start: segment.start_time,
            end: segment.end_time,
            duration: segment.duration(),
            volume: segment.volume,
            speed: segment.speed,
            action: segment.action,
            start_formatted: format_timestamp(segment.start_time),
            raw: segment.raw.clone(),
        }
    }
}
