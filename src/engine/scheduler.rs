//! The polling loop body.
//!
//! `poll` is what a host calls every frame: it runs due timers, switches
//! between running and suspended depending on the transport state, and
//! ticks while the player is playing. `tick` is the segment scheduler
//! proper: it samples the position, feeds the seek detector and decides
//! between entry, exit and no-op.

use std::time::Duration;

use tracing::{debug, trace};

use super::state::PollMode;
use super::timers::Deferred;
use super::{Engine, Notifier};
use crate::directive::{segment_containing, Segment};
use crate::player::Player;

impl<P: Player, N: Notifier> Engine<P, N> {
    /// One iteration of the polling loop at time `now`.
    pub fn poll(&mut self, now: Duration) {
        self.advance(now);

        let mode = match self.player.state() {
            Ok(state) if state.is_playing() => PollMode::Running,
            Ok(_) => PollMode::Suspended,
            Err(err) => {
                trace!(error = %err, "player state unavailable");
                PollMode::Suspended
            }
        };
        if mode != self.poll_mode {
            debug!(?mode, "polling mode changed");
            self.poll_mode = mode;
        }

        if mode == PollMode::Running {
            self.tick(now);
        }
    }

    /// Run every deferred task due at or before `now`, earliest first.
    ///
    /// Each task sees its own due time as the current instant, so work it
    /// schedules is timed from when it should have run.
    pub fn advance(&mut self, now: Duration) {
        while let Some(scheduled) = self.state.timers.pop_due(now) {
            trace!(task = ?scheduled.task, due = ?scheduled.due, "timer fired");
            self.run_deferred(scheduled.task, scheduled.due);
        }
    }

    /// Sample the playhead once and enter, exit or do nothing.
    ///
    /// Never fails: an unavailable player skips the tick.
    pub fn tick(&mut self, now: Duration) {
        let time = match self.player.current_time() {
            Ok(time) if time.is_finite() => time,
            Ok(time) => {
                debug!(time, "ignoring non-finite position");
                return;
            }
            Err(err) => {
                debug!(error = %err, "no position this tick");
                return;
            }
        };

        self.observe_position(time, now);

        match self.find_candidate(time) {
            Some(candidate) => {
                let tolerance = self.config.tolerance;
                let is_new = self
                    .state
                    .active_segment
                    .as_ref()
                    .map_or(true, |active| !active.same_directive(&candidate, tolerance));
                if is_new && !self.state.entry_guard {
                    self.enter(candidate, time, now);
                }
            }
            None => {
                if self.state.active_segment.is_some() && !self.state.exit_guard {
                    self.exit(now);
                }
            }
        }
    }

    /// The segment the playhead at `time` should be in.
    ///
    /// With a segment active, any containing segment counts so the scheduler
    /// can tell "still inside" from "left". With none active, only segments
    /// past the watermark are eligible.
    fn find_candidate(&self, time: f64) -> Option<Segment> {
        let tolerance = self.config.tolerance;
        let segments = self.cache.segments();
        if self.state.active_segment.is_some() {
            segment_containing(segments, time, tolerance).cloned()
        } else {
            segments
                .iter()
                .find(|s| s.contains(time, tolerance) && self.state.is_eligible(s.sequence_index))
                .cloned()
        }
    }

    fn run_deferred(&mut self, task: Deferred, fired_at: Duration) {
        match task {
            Deferred::ReleaseEntryGuard => self.state.entry_guard = false,
            Deferred::ReleaseExitGuard => self.state.exit_guard = false,
            Deferred::ResumeAfterPause { seconds } => self.resume_after_pause(seconds),
            Deferred::AutoJump { origin } => self.fire_auto_jump(origin, fired_at),
            Deferred::SettleRestore => self.settle_restore(),
        }
    }
}
