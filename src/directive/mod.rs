//! Inline playback directives
//!
//! Notes carry time-coded directives such as
//! `[00:01:05-00:01:20, 40%, 1.50x, ->]`. This module owns everything about
//! that syntax:
//!
//! - `parser`: text → ordered [`Segment`]s, plus the identity-keyed [`ParseCache`]
//! - `segment`: the [`Segment`], [`Action`] and [`PlaybackSettings`] types
//! - `lookup`: text offsets and playback times → segments
//! - `format`: `HH:MM:SS` rendering
//! - `stamp`: inserting a new directive at the playhead
//!
//! Appearance order in the note is the priority order. Nothing here sorts
//! segments by time.

mod format;
mod lookup;
mod parser;
mod segment;
mod stamp;

pub use format::format_timestamp;
pub use lookup::{nearest_segment, segment_at_offset, segment_containing, ActivationPoint};
pub use parser::{parse, ParseCache};
pub use segment::{Action, PlaybackSettings, Segment, SegmentSummary};
pub use stamp::{insert_stamp, StampOutcome};
