//! Manual-seek detection.
//!
//! Any jump between consecutive samples larger than the threshold is taken
//! as the user scrubbing the timeline, except within the suppress window
//! that follows the engine's own seeks.

use std::time::Duration;

use tracing::{debug, info};

use super::notify::EngineEvent;
use super::timers::TimerSlot;
use super::{Engine, Notifier};
use crate::directive::{nearest_segment, segment_containing, Segment};
use crate::player::Player;

/// Watermark to resume from after the user seeked to `time`.
///
/// The segment containing `time` (or else the one starting nearest to it)
/// becomes eligible again, along with everything after it. Returns -1 when
/// there are no segments.
pub fn watermark_after_seek(segments: &[Segment], time: f64, tolerance: f64) -> i64 {
    segment_containing(segments, time, tolerance)
        .or_else(|| nearest_segment(segments, time))
        .map_or(-1, |segment| (segment.sequence_index as i64 - 1).max(-1))
}

impl<P: Player, N: Notifier> Engine<P, N> {
    /// Record the sample at `time`, handling a manual seek if one happened.
    pub(super) fn observe_position(&mut self, time: f64, now: Duration) {
        if let Some(until) = self.state.suppress_manual_seek_until {
            if now < until {
                self.state.last_sampled_time = Some(time);
                return;
            }
            self.state.suppress_manual_seek_until = None;
        }

        if let Some(last) = self.state.last_sampled_time {
            if (time - last).abs() > self.config.manual_seek_threshold {
                self.handle_manual_seek(last, time);
            }
        }
        self.state.last_sampled_time = Some(time);
    }

    fn handle_manual_seek(&mut self, from: f64, to: f64) {
        if let Some(cancelled) = self.state.timers.cancel(TimerSlot::AutoJump) {
            debug!(id = ?cancelled.id, "manual seek cancelled pending auto-jump");
        }

        let watermark = watermark_after_seek(self.cache.segments(), to, self.config.tolerance);
        self.state.last_consumed_index = watermark;
        self.state.release_guards();
        self.state.prior_settings = None;

        info!(from, to, watermark, "manual seek detected");
        self.emit(EngineEvent::ManualSeek { from, to, watermark });
    }
}
