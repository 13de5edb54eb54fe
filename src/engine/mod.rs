//! Timestamp-driven playback control engine
//!
//! The engine matches the playhead against the segments parsed from a note
//! and drives the player: volume and speed on entry, restoration on exit,
//! pauses, auto-jumps to the next segment, and recovery from user seeks.
//!
//! # Architecture
//!
//! - `state`: [`EngineState`], the single struct every path mutates
//! - `timers`: cancellable deferred work, one outstanding task per subsystem
//! - `scheduler`: the polling loop body (`poll`, `tick`, `advance`)
//! - `transition`: entry/exit and the pause action
//! - `seek_detector`: classifying large position jumps as user seeks
//! - `auto_jump`: chaining to the next segment at the end of a window
//! - `activation`: direct user activation that bypasses the watermark
//! - `notify`: notifications surfaced for every transition
//!
//! The engine is single-threaded. Time is passed in explicitly as a
//! [`Duration`] since an arbitrary origin, so the same code runs against a
//! wall clock or a manual one. Hosts on a multi-threaded runtime must
//! serialize calls (one owner, or a mutex around the engine).
//!
//! # Usage
//!
//! ```
//! use std::time::Duration;
//! use notecue::engine::{Engine, EngineConfig};
//! use notecue::player::{Player, SimulatedPlayer};
//! use notecue::runtime::ManualClock;
//!
//! let clock = ManualClock::new();
//! let mut player = SimulatedPlayer::new(clock.clone(), 600.0);
//! player.play().unwrap();
//! player.user_seek(2.0);
//!
//! let mut engine = Engine::new(player, Vec::new(), EngineConfig::default());
//! engine.set_text("[00:00:01-00:00:03, 50%, 1.00x]");
//! engine.poll(Duration::ZERO);
//!
//! assert_eq!(engine.player().volume().unwrap(), 50);
//! ```

mod activation;
mod auto_jump;
mod config;
mod error;
mod notify;
mod scheduler;
mod seek_detector;
mod state;
#[cfg(test)]
mod testing;
mod timers;
mod transition;

use std::time::Duration;

use tracing::{debug, info};

pub use auto_jump::auto_jump_delay;
pub use config::{EngineConfig, RestorePolicy};
pub use error::EngineError;
pub use notify::{EngineEvent, Level, Notification, Notifier, TracingNotifier};
pub use seek_detector::watermark_after_seek;
pub use state::{AutoJumpStatus, EngineState, EntryKind, PollMode, SegmentPhase};
pub use timers::{Deferred, Scheduled, TimerId, TimerSlot, Timers};

use crate::directive::{ParseCache, PlaybackSettings, Segment};
use crate::player::Player;

/// Playback control engine over a player `P`, reporting to notifier `N`.
#[derive(Debug)]
pub struct Engine<P, N = TracingNotifier> {
    player: P,
    notifier: N,
    config: EngineConfig,
    cache: ParseCache,
    state: EngineState,
    poll_mode: PollMode,
    /// Volume/speed most recently applied by the engine
    observed: PlaybackSettings,
    video_id: Option<String>,
}

impl<P: Player, N: Notifier> Engine<P, N> {
    pub fn new(player: P, notifier: N, config: EngineConfig) -> Self {
        let observed = config.defaults;
        Self {
            player,
            notifier,
            config,
            cache: ParseCache::new(),
            state: EngineState::new(),
            poll_mode: PollMode::Suspended,
            observed,
            video_id: None,
        }
    }

    /// Replace the note text.
    ///
    /// Segments are re-parsed only when the text actually changed. All other
    /// state (active segment, watermark, timers) carries over.
    /// Returns `true` if the segment list was rebuilt.
    pub fn set_text(&mut self, text: &str) -> bool {
        let changed = self.cache.update(text);
        if changed {
            debug!(segments = self.cache.segments().len(), "note text re-parsed");
        }
        changed
    }

    /// Switch to another video.
    ///
    /// A new id resets the whole engine state and cancels every timer.
    /// Returns `true` if the id changed.
    pub fn set_video(&mut self, video_id: &str) -> bool {
        if self.video_id.as_deref() == Some(video_id) {
            return false;
        }
        info!(video_id, "video changed, resetting engine state");
        self.video_id = Some(video_id.to_string());
        self.reset();
        true
    }

    /// Return to the initial state, cancelling all pending work.
    pub fn reset(&mut self) {
        self.state.reset();
        self.poll_mode = PollMode::Suspended;
    }

    pub fn segments(&self) -> &[Segment] {
        self.cache.segments()
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn phase(&self) -> SegmentPhase {
        self.state.phase()
    }

    pub fn poll_mode(&self) -> PollMode {
        self.poll_mode
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn active_segment(&self) -> Option<&Segment> {
        self.state.active_segment.as_ref()
    }

    /// Volume and speed the engine last applied, for UI mirrors.
    pub fn observed_settings(&self) -> PlaybackSettings {
        self.observed
    }

    /// Whether an entry or exit is still inside its debounce window.
    pub fn is_transitioning(&self) -> bool {
        self.state.is_transitioning()
    }

    /// The pending auto-jump and time left until it fires.
    pub fn auto_jump_status(&self, now: Duration) -> Option<AutoJumpStatus> {
        self.state.pending_auto_jump(now)
    }

    /// Earliest instant at which a timer needs to run.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.state.timers.next_due()
    }

    pub fn video_id(&self) -> Option<&str> {
        self.video_id.as_deref()
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut P {
        &mut self.player
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    pub fn into_parts(self) -> (P, N) {
        (self.player, self.notifier)
    }

    fn emit(&mut self, event: EngineEvent) {
        self.notifier.notify(Notification::new(event));
    }
}
