//! Resolving positions in the note text back to segments.

use serde::{Deserialize, Serialize};

use super::segment::Segment;

/// Which end of a segment an explicit activation seeks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivationPoint {
    Start,
    End,
}

impl std::fmt::Display for ActivationPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivationPoint::Start => write!(f, "start"),
            ActivationPoint::End => write!(f, "end"),
        }
    }
}

/// Find the segment whose directive text covers byte `offset`.
///
/// Offsets after the dash that separates the two times select
/// [`ActivationPoint::End`]; anything up to and including the dash selects
/// [`ActivationPoint::Start`]. Both span ends are inclusive so a click right
/// after the closing bracket still resolves.
pub fn segment_at_offset(
    segments: &[Segment],
    offset: usize,
) -> Option<(&Segment, ActivationPoint)> {
    let segment = segments
        .iter()
        .find(|s| offset >= s.span.start && offset <= s.span.end)?;

    let point = match segment.raw.find('-') {
        Some(dash) if offset > segment.span.start + dash => ActivationPoint::End,
        _ => ActivationPoint::Start,
    };

    Some((segment, point))
}

/// The segment containing `time`, first in appearance order.
pub fn segment_containing(segments: &[Segment], time: f64, tolerance: f64) -> Option<&Segment> {
    segments.iter().find(|s| s.contains(time, tolerance))
}

/// The segment whose start is closest to `time`.
///
/// Ties go to the segment that appears first in the text.
pub fn nearest_segment(segments: &[Segment], time: f64) -> Option<&Segment> {
    segments.iter().fold(None, |best: Option<&Segment>, candidate| match best {
        Some(current)
            if (current.start_time - time).abs() <= (candidate.start_time - time).abs() =>
        {
            Some(current)
        }
        _ => Some(candidate),
    })
}
