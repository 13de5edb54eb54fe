//! Segment entry, exit and the pause action.

use std::time::Duration;

use tracing::{debug, info, warn};

use super::config::RestorePolicy;
use super::notify::EngineEvent;
use super::state::EntryKind;
use super::timers::{Deferred, TimerSlot};
use super::{Engine, Notifier};
use crate::directive::{Action, PlaybackSettings, Segment};
use crate::player::{Player, PlayerError};

/// Deferred tasks that belong to whichever segment was last activated.
const ACTION_SLOTS: [TimerSlot; 3] = [
    TimerSlot::PauseResume,
    TimerSlot::AutoJump,
    TimerSlot::SettleRestore,
];

impl<P: Player, N: Notifier> Engine<P, N> {
    /// Automatic entry into `segment` with the playhead at `time`.
    pub(super) fn enter(&mut self, segment: Segment, time: f64, now: Duration) {
        self.state.entry_guard = true;
        match self.try_enter(&segment, time, now) {
            Ok(()) => self.schedule_guard_release(Deferred::ReleaseEntryGuard, now),
            Err(err) => self.fail_transition("entry", err),
        }
    }

    fn try_enter(
        &mut self,
        segment: &Segment,
        time: f64,
        now: Duration,
    ) -> Result<(), PlayerError> {
        self.capture_prior_settings()?;
        let settings = segment.settings();
        self.apply_settings(settings)?;

        self.supersede_actions();
        self.state.active_segment = Some(segment.clone());
        self.state.entered_via = EntryKind::Automatic;
        self.state.last_consumed_index = segment.sequence_index as i64;
        self.observed = settings;

        info!(segment = %segment.label(), %settings, "entered segment");
        self.emit(EngineEvent::Entered {
            index: segment.sequence_index,
            start: segment.start_time,
            end: segment.end_time,
            settings,
        });

        self.start_action(segment, time, now)
    }

    /// Leave the active segment and restore settings.
    pub(super) fn exit(&mut self, now: Duration) {
        let Some(active) = self.state.active_segment.clone() else {
            return;
        };
        self.state.exit_guard = true;

        let target = self.restore_target();
        match self.apply_settings(target) {
            Ok(()) => {
                self.state.active_segment = None;
                self.state.entered_via = EntryKind::Automatic;
                self.state.prior_settings = None;
                self.observed = target;
                self.schedule_guard_release(Deferred::ReleaseExitGuard, now);

                info!(segment = %active.label(), restored = %target, "left segment");
                self.emit(EngineEvent::Exited {
                    index: active.sequence_index,
                    restored: target,
                });
            }
            Err(err) => self.fail_transition("exit", err),
        }
    }

    /// Start the segment's trailing action with the playhead at `time`.
    pub(super) fn start_action(
        &mut self,
        segment: &Segment,
        time: f64,
        now: Duration,
    ) -> Result<(), PlayerError> {
        match segment.action {
            Action::None => Ok(()),
            Action::PauseFor(seconds) => self.start_pause(segment.sequence_index, seconds, now),
            Action::AutoJump => {
                self.schedule_auto_jump(segment, time, now);
                Ok(())
            }
        }
    }

    fn start_pause(
        &mut self,
        index: usize,
        seconds: u32,
        now: Duration,
    ) -> Result<(), PlayerError> {
        self.player.pause()?;
        let due = now.saturating_add(Duration::from_secs(u64::from(seconds)));
        self.state
            .timers
            .schedule(due, Deferred::ResumeAfterPause { seconds });
        info!(index, seconds, "paused playback");
        self.emit(EngineEvent::PauseStarted { index, seconds });
        Ok(())
    }

    pub(super) fn resume_after_pause(&mut self, seconds: u32) {
        match self.player.play() {
            Ok(()) => {
                info!(seconds, "resumed playback after pause");
                self.emit(EngineEvent::PauseEnded { seconds });
            }
            Err(err) => self.fail_transition("pause resume", err),
        }
    }

    /// Report a failed player call and drop both guards so the next tick
    /// can try again.
    pub(super) fn fail_transition(&mut self, stage: &'static str, err: PlayerError) {
        warn!(stage, error = %err, "player call failed, releasing guards");
        self.state.release_guards();
        self.emit(EngineEvent::PlayerFailed {
            stage,
            message: err.to_string(),
        });
    }

    /// Settings an exit or chain end should put back.
    pub(super) fn restore_target(&self) -> PlaybackSettings {
        match self.config.restore_policy {
            RestorePolicy::Defaults => self.config.defaults,
            RestorePolicy::PriorSettings => {
                self.state.prior_settings.unwrap_or(self.config.defaults)
            }
        }
    }

    /// Remember the player's own settings, once per chain.
    pub(super) fn capture_prior_settings(&mut self) -> Result<(), PlayerError> {
        if self.state.prior_settings.is_none() {
            let settings =
                PlaybackSettings::new(self.player.volume()?, self.player.playback_rate()?);
            debug!(%settings, "captured prior settings");
            self.state.prior_settings = Some(settings);
        }
        Ok(())
    }

    pub(super) fn apply_settings(&mut self, settings: PlaybackSettings) -> Result<(), PlayerError> {
        self.player.set_volume(settings.volume)?;
        self.player.set_playback_rate(settings.speed)
    }

    /// Cancel the pause, auto-jump and settle tasks of an earlier activation.
    pub(super) fn supersede_actions(&mut self) {
        for slot in ACTION_SLOTS {
            if let Some(stale) = self.state.timers.cancel(slot) {
                debug!(?slot, id = ?stale.id, "superseded pending task");
            }
        }
    }

    fn schedule_guard_release(&mut self, task: Deferred, now: Duration) {
        let due = now.saturating_add(self.config.guard_debounce);
        self.state.timers.schedule(due, task);
    }
}
