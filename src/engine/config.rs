//! Engine tuning and restore policy.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::directive::PlaybackSettings;

/// Which settings a segment exit restores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RestorePolicy {
    /// Restore the configured default playback settings
    #[default]
    Defaults,
    /// Restore what the player had before the first entry of the chain,
    /// falling back to the defaults when nothing was captured
    PriorSettings,
}

impl std::fmt::Display for RestorePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RestorePolicy::Defaults => write!(f, "defaults"),
            RestorePolicy::PriorSettings => write!(f, "prior-settings"),
        }
    }
}

/// Runtime parameters for the [`Engine`](super::Engine).
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Settings restored on exit under [`RestorePolicy::Defaults`]
    pub defaults: PlaybackSettings,
    pub restore_policy: RestorePolicy,
    /// Slack, in seconds, on both ends of a window and in directive comparison
    pub tolerance: f64,
    /// Position jumps larger than this many seconds count as user seeks
    pub manual_seek_threshold: f64,
    /// How long entry/exit guards stay up after a transition
    pub guard_debounce: Duration,
    /// Floor for the auto-jump delay
    pub min_auto_jump_delay: Duration,
    /// Wait between an auto-jump seek and the settings restore
    pub settle_delay: Duration,
    /// Window after an engine-issued seek during which jumps are not user seeks
    pub suppress_window: Duration,
    /// Seeks at most this many seconds away skip the buffer reload
    pub short_seek_distance: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            defaults: PlaybackSettings::default(),
            restore_policy: RestorePolicy::Defaults,
            tolerance: 0.01,
            manual_seek_threshold: 2.0,
            guard_debounce: Duration::from_millis(100),
            min_auto_jump_delay: Duration::from_millis(100),
            settle_delay: Duration::from_millis(100),
            suppress_window: Duration::from_millis(1000),
            short_seek_distance: 10.0,
        }
    }
}
