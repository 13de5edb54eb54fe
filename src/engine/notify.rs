//! Notifications emitted on every transition.
//!
//! Each notification carries a human-readable message for the UI layer and
//! the structured [`EngineEvent`] it was rendered from, so callers (and
//! tests) can react to what happened without parsing strings.

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::directive::{format_timestamp, ActivationPoint, PlaybackSettings};

/// Severity tag for a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Level::Info => "info",
            Level::Success => "success",
            Level::Warning => "warning",
            Level::Error => "error",
        };
        write!(f, "{}", name)
    }
}

/// Something the engine did.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EngineEvent {
    /// A segment was entered by the scheduler
    Entered {
        index: usize,
        start: f64,
        end: f64,
        settings: PlaybackSettings,
    },
    /// The active segment was left and settings restored
    Exited {
        index: usize,
        restored: PlaybackSettings,
    },
    /// Playback paused by a `|N` action
    PauseStarted { index: usize, seconds: u32 },
    /// Playback resumed after a `|N` action
    PauseEnded { seconds: u32 },
    /// An auto-jump was armed
    AutoJumpScheduled {
        from: usize,
        to: Option<usize>,
        delay: Duration,
    },
    /// An auto-jump seeked to the next segment
    AutoJumped {
        from: usize,
        to: usize,
        target_time: f64,
        distance: f64,
    },
    /// An auto-jump had no next segment; the chain ended
    ChainEnded {
        from: usize,
        restored: PlaybackSettings,
    },
    /// Settings restored after an auto-jump settled
    SettingsRestored { restored: PlaybackSettings },
    /// A segment was activated directly by the user
    Activated {
        index: usize,
        point: ActivationPoint,
        target_time: f64,
        settings: PlaybackSettings,
    },
    /// A position jump was attributed to the user
    ManualSeek { from: f64, to: f64, watermark: i64 },
    /// A player call failed during a transition
    PlayerFailed { stage: &'static str, message: String },
}

impl EngineEvent {
    /// Severity used when this event is surfaced.
    pub fn level(&self) -> Level {
        match self {
            EngineEvent::Entered { .. }
            | EngineEvent::Exited { .. }
            | EngineEvent::AutoJumpScheduled { .. }
            | EngineEvent::ChainEnded { .. }
            | EngineEvent::ManualSeek { .. } => Level::Info,
            EngineEvent::PauseEnded { .. }
            | EngineEvent::AutoJumped { .. }
            | EngineEvent::SettingsRestored { .. }
            | EngineEvent::Activated { .. } => Level::Success,
            EngineEvent::PauseStarted { .. } => Level::Warning,
            EngineEvent::PlayerFailed { .. } => Level::Error,
        }
    }
}

impl fmt::Display for EngineEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineEvent::Entered {
                index,
                start,
                end,
                settings,
            } => write!(
                f,
                "Entered #{} [{}-{}]: {}",
                index,
                format_timestamp(*start),
                format_timestamp(*end),
                settings
            ),
            EngineEvent::Exited { index, restored } => {
                write!(f, "Left #{}: restored {}", index, restored)
            }
            EngineEvent::PauseStarted { index, seconds } => {
                write!(f, "Paused for {}s at #{}", seconds, index)
            }
            EngineEvent::PauseEnded { seconds } => {
                write!(f, "Playback resumed after {}s pause", seconds)
            }
            EngineEvent::AutoJumpScheduled { from, to, delay } => match to {
                Some(to) => write!(
                    f,
                    "Auto-jump from #{} to #{} in {:.2}s",
                    from,
                    to,
                    delay.as_secs_f64()
                ),
                None => write!(
                    f,
                    "Auto-jump from #{} in {:.2}s (no next segment yet)",
                    from,
                    delay.as_secs_f64()
                ),
            },
            EngineEvent::AutoJumped {
                from,
                to,
                target_time,
                distance,
            } => write!(
                f,
                "Auto-jumped from #{} to #{} at {} (distance {:.1}s)",
                from,
                to,
                format_timestamp(*target_time),
                distance
            ),
            EngineEvent::ChainEnded { from, restored } => write!(
                f,
                "Auto-jump chain ended after #{}: restored {}",
                from, restored
            ),
            EngineEvent::SettingsRestored { restored } => {
                write!(f, "Settings restored: {}", restored)
            }
            EngineEvent::Activated {
                index,
                point,
                target_time,
                settings,
            } => write!(
                f,
                "Activated #{} at its {} ({}): {}",
                index,
                point,
                format_timestamp(*target_time),
                settings
            ),
            EngineEvent::ManualSeek { from, to, watermark } => write!(
                f,
                "Manual seek {} -> {}: next eligible after #{}",
                format_timestamp(*from),
                format_timestamp(*to),
                watermark
            ),
            EngineEvent::PlayerFailed { stage, message } => {
                write!(f, "Player unavailable during {}: {}", stage, message)
            }
        }
    }
}

/// A tagged, human-readable status update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub level: Level,
    pub message: String,
    #[serde(flatten)]
    pub event: EngineEvent,
}

impl Notification {
    pub fn new(event: EngineEvent) -> Self {
        Self {
            level: event.level(),
            message: event.to_string(),
            event,
        }
    }
}

/// Receiver for engine notifications.
pub trait Notifier {
    fn notify(&mut self, notification: Notification);
}

/// Collects notifications in memory.
impl Notifier for Vec<Notification> {
    fn notify(&mut self, notification: Notification) {
        self.push(notification);
    }
}

/// Forwards notifications to `tracing` at a matching level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&mut self, notification: Notification) {
        match notification.level {
            Level::Info | Level::Success => {
                info!(level = %notification.level, "{}", notification.message)
            }
            Level::Warning => warn!("{}", notification.message),
            Level::Error => error!("{}", notification.message),
        }
    }
}
