//! Auto-jump chaining.
//!
//! A segment ending in `->` arms a timer for when the playhead should reach
//! its end. When the timer fires the engine seeks to the segment with the
//! next sequence index, looked up at that moment so an edit made while the
//! timer was pending is honored. After the seek settles, settings are
//! restored; entry into the next segment cancels that restore.

use std::time::Duration;

use tracing::{debug, info};

use super::notify::EngineEvent;
use super::state::EntryKind;
use super::timers::Deferred;
use super::{Engine, Notifier};
use crate::directive::Segment;
use crate::player::{Player, PlayerError};

/// Wall-clock time until the playhead at `time` reaches the end of
/// `segment`, at the segment's speed, never less than `min_delay`.
///
/// # Arguments
/// * `segment` - The segment that armed the jump
/// * `time` - Playhead position in seconds
/// * `min_delay` - Floor for the result
pub fn auto_jump_delay(segment: &Segment, time: f64, min_delay: Duration) -> Duration {
    let remaining = (segment.end_time - time) / segment.speed;
    if !remaining.is_finite() || remaining <= 0.0 {
        return min_delay;
    }
    // Near-zero speeds overflow Duration; treat them as never due
    Duration::try_from_secs_f64(remaining)
        .unwrap_or(Duration::MAX)
        .max(min_delay)
}

impl<P: Player, N: Notifier> Engine<P, N> {
    pub(super) fn schedule_auto_jump(&mut self, origin: &Segment, time: f64, now: Duration) {
        let delay = auto_jump_delay(origin, time, self.config.min_auto_jump_delay);
        let (id, superseded) = self.state.timers.schedule(
            now.saturating_add(delay),
            Deferred::AutoJump {
                origin: origin.clone(),
            },
        );
        if let Some(stale) = superseded {
            debug!(id = ?stale.id, "replaced pending auto-jump");
        }

        let to = self
            .cache
            .get(origin.sequence_index + 1)
            .map(|next| next.sequence_index);
        debug!(?id, from = origin.sequence_index, ?to, ?delay, "auto-jump armed");
        self.emit(EngineEvent::AutoJumpScheduled {
            from: origin.sequence_index,
            to,
            delay,
        });
    }

    /// Timer body for an auto-jump armed by `origin`.
    ///
    /// `origin` stays active until the seek succeeds, so a failed jump
    /// leaves the scheduler to exit it on a later tick.
    pub(super) fn fire_auto_jump(&mut self, origin: Segment, fired_at: Duration) {
        let consumed = origin.sequence_index as i64;
        if self.state.last_consumed_index < consumed {
            self.state.last_consumed_index = consumed;
        }

        let Some(next) = self.cache.get(origin.sequence_index + 1).cloned() else {
            self.end_chain(&origin);
            return;
        };

        self.state.release_guards();

        match self.seek_and_play(next.start_time) {
            Ok(distance) => {
                self.state.active_segment = None;
                self.state.entered_via = EntryKind::Automatic;
                self.state.suppress_manual_seek_until =
                    Some(fired_at.saturating_add(self.config.suppress_window));
                self.state.timers.schedule(
                    fired_at.saturating_add(self.config.settle_delay),
                    Deferred::SettleRestore,
                );

                info!(
                    from = %origin.label(),
                    to = next.sequence_index,
                    target = next.start_time,
                    distance,
                    "auto-jumped"
                );
                self.emit(EngineEvent::AutoJumped {
                    from: origin.sequence_index,
                    to: next.sequence_index,
                    target_time: next.start_time,
                    distance,
                });
            }
            Err(err) => self.fail_transition("auto-jump", err),
        }
    }

    /// No segment follows `origin`: restore settings and stop.
    fn end_chain(&mut self, origin: &Segment) {
        let target = self.restore_target();
        match self.apply_settings(target) {
            Ok(()) => {
                self.state.active_segment = None;
                self.state.entered_via = EntryKind::Automatic;
                self.state.prior_settings = None;
                self.observed = target;
                info!(from = origin.sequence_index, restored = %target, "auto-jump chain ended");
                self.emit(EngineEvent::ChainEnded {
                    from: origin.sequence_index,
                    restored: target,
                });
            }
            Err(err) => self.fail_transition("auto-jump", err),
        }
    }

    /// Timer body run once an auto-jump's seek has settled.
    pub(super) fn settle_restore(&mut self) {
        if self.state.active_segment.is_some() {
            debug!("segment active at settle time, keeping its settings");
            return;
        }
        let target = self.restore_target();
        match self.apply_settings(target) {
            Ok(()) => {
                self.state.prior_settings = None;
                self.observed = target;
                debug!(restored = %target, "settings restored after auto-jump");
                self.emit(EngineEvent::SettingsRestored { restored: target });
            }
            Err(err) => self.fail_transition("settle restore", err),
        }
    }

    /// Seek to `target` and resume playback.
    ///
    /// Distant seeks may reload the buffer; short hops keep it. Returns the
    /// distance travelled in seconds.
    pub(super) fn seek_and_play(&mut self, target: f64) -> Result<f64, PlayerError> {
        let position = self.player.current_time()?;
        let distance = (target - position).abs();
        let allow_buffer_reload = distance > self.config.short_seek_distance;
        self.player.seek_to(target, allow_buffer_reload)?;
        self.player.play()?;
        Ok(distance)
    }
}
