//! Engine state
//!
//! Contains the central `EngineState` struct that holds everything the
//! scheduler mutates between ticks, plus the small enums describing how the
//! active segment was entered and where the state machine currently is.

use std::time::Duration;

use super::timers::{Deferred, TimerSlot, Timers};
use crate::directive::{PlaybackSettings, Segment};

/// How the active segment was entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// The scheduler found the playhead inside the segment
    Automatic,
    /// The user activated the segment directly
    Explicit,
}

/// Where the segment state machine currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentPhase {
    /// No active segment
    Idle,
    /// A segment is active and has no outstanding action
    Entered,
    /// A segment is active and its pause or auto-jump is pending
    ActionRunning,
    /// A segment is active because the user activated it
    ExplicitlyEntered,
}

/// Whether the polling loop is ticking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollMode {
    /// Player is not playing; ticks are skipped
    Suspended,
    /// Player is playing; every poll ticks
    Running,
}

/// A pending auto-jump, as seen from outside the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct AutoJumpStatus {
    /// Sequence index of the segment that armed the jump
    pub origin_index: usize,
    /// Sequence index the jump will look for when it fires
    pub target_index: usize,
    /// When the jump fires
    pub due: Duration,
    /// Time left until `due`
    pub remaining: Duration,
}

/// Everything the engine mutates while playback runs.
///
/// Owned by a single [`Engine`](super::Engine); all mutation goes through
/// its methods.
#[derive(Debug)]
pub struct EngineState {
    // === Activation ===
    /// The segment currently entered
    pub active_segment: Option<Segment>,
    /// How `active_segment` was entered
    pub entered_via: EntryKind,
    /// Segments with `sequence_index <= last_consumed_index` are skipped by
    /// automatic entry (-1 = nothing consumed)
    pub last_consumed_index: i64,

    // === Transition guards ===
    /// An entry is being processed; further entries wait for the debounce
    pub entry_guard: bool,
    /// An exit is being processed; further exits wait for the debounce
    pub exit_guard: bool,

    // === Restoration ===
    /// Player settings captured at the first entry of the current chain
    pub prior_settings: Option<PlaybackSettings>,

    // === Manual-seek detection ===
    /// Last position the scheduler observed
    pub last_sampled_time: Option<f64>,
    /// Until this instant, position jumps are the engine's own seeks
    pub suppress_manual_seek_until: Option<Duration>,

    // === Deferred work ===
    /// Guard releases, pause-resume, auto-jump and settle timers
    pub timers: Timers,
}

impl EngineState {
    pub fn new() -> Self {
        Self {
            active_segment: None,
            entered_via: EntryKind::Automatic,
            last_consumed_index: -1,
            entry_guard: false,
            exit_guard: false,
            prior_settings: None,
            last_sampled_time: None,
            suppress_manual_seek_until: None,
            timers: Timers::new(),
        }
    }

    /// Return to the initial state, cancelling all timers.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Whether either transition guard is held.
    pub fn is_transitioning(&self) -> bool {
        self.entry_guard || self.exit_guard
    }

    /// Drop both guards and their pending releases.
    pub fn release_guards(&mut self) {
        self.entry_guard = false;
        self.exit_guard = false;
        self.timers.cancel(TimerSlot::EntryGuard);
        self.timers.cancel(TimerSlot::ExitGuard);
    }

    /// Whether a segment with `sequence_index` may be entered automatically.
    pub fn is_eligible(&self, sequence_index: usize) -> bool {
        sequence_index as i64 > self.last_consumed_index
    }

    /// Current state machine phase.
    pub fn phase(&self) -> SegmentPhase {
        match (&self.active_segment, self.entered_via) {
            (None, _) => SegmentPhase::Idle,
            (Some(_), EntryKind::Explicit) => SegmentPhase::ExplicitlyEntered,
            (Some(_), EntryKind::Automatic)
                if self.timers.is_pending(TimerSlot::PauseResume)
                    || self.timers.is_pending(TimerSlot::AutoJump) =>
            {
                SegmentPhase::ActionRunning
            }
            (Some(_), EntryKind::Automatic) => SegmentPhase::Entered,
        }
    }

    /// The pending auto-jump, if one is armed.
    pub fn pending_auto_jump(&self, now: Duration) -> Option<AutoJumpStatus> {
        let scheduled = self.timers.get(TimerSlot::AutoJump)?;
        match &scheduled.task {
            Deferred::AutoJump { origin } => Some(AutoJumpStatus {
                origin_index: origin.sequence_index,
                target_index: origin.sequence_index + 1,
                due: scheduled.due,
                remaining: scheduled.due.saturating_sub(now),
            }),
            _ => None,
        }
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::new()
    }
}
