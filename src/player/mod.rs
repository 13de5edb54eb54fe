//! Media player capability surface
//!
//! The engine never talks to a concrete player. It drives anything that
//! implements [`Player`]: position/volume/rate queries plus transport and
//! settings commands. Every call can fail (player not loaded yet, embed
//! gone away), and the engine treats those failures as recoverable.
//!
//! - [`SimulatedPlayer`]: in-memory player driven by a [`Clock`](crate::runtime::Clock),
//!   used by `notecue simulate` and the test suite.

mod simulated;

pub use simulated::{PlayerCommand, SimulatedPlayer, SUPPORTED_RATES};

/// Transport state reported by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerState {
    Unstarted,
    Ended,
    Playing,
    Paused,
    Buffering,
    Cued,
}

impl PlayerState {
    /// Map the numeric state codes used by embedded web players.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            -1 => Some(PlayerState::Unstarted),
            0 => Some(PlayerState::Ended),
            1 => Some(PlayerState::Playing),
            2 => Some(PlayerState::Paused),
            3 => Some(PlayerState::Buffering),
            5 => Some(PlayerState::Cued),
            _ => None,
        }
    }

    pub fn to_code(&self) -> i32 {
        match self {
            PlayerState::Unstarted => -1,
            PlayerState::Ended => 0,
            PlayerState::Playing => 1,
            PlayerState::Paused => 2,
            PlayerState::Buffering => 3,
            PlayerState::Cued => 5,
        }
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, PlayerState::Playing)
    }
}

impl std::fmt::Display for PlayerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PlayerState::Unstarted => "unstarted",
            PlayerState::Ended => "ended",
            PlayerState::Playing => "playing",
            PlayerState::Paused => "paused",
            PlayerState::Buffering => "buffering",
            PlayerState::Cued => "cued",
        };
        write!(f, "{}", name)
    }
}

/// Errors returned by player calls.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlayerError {
    #[error("Player is not ready")]
    NotReady,

    #[error("Player call '{call}' failed: {message}")]
    CallFailed { call: &'static str, message: String },
}

/// Capabilities the engine needs from a media player.
///
/// Volume is 0-100. Rates may be quantized by the player; the engine reads
/// back whatever the player reports and never assumes the exact value stuck.
pub trait Player {
    /// Current playhead position in seconds.
    fn current_time(&self) -> Result<f64, PlayerError>;

    /// Current volume, 0-100.
    fn volume(&self) -> Result<u8, PlayerError>;

    /// Current playback rate.
    fn playback_rate(&self) -> Result<f64, PlayerError>;

    /// Current transport state.
    fn state(&self) -> Result<PlayerState, PlayerError>;

    /// Seek to `seconds`.
    ///
    /// `allow_buffer_reload` lets the player discard its buffer and fetch
    /// from the new position; short hops should pass `false`.
    fn seek_to(&mut self, seconds: f64, allow_buffer_reload: bool) -> Result<(), PlayerError>;

    fn set_volume(&mut self, volume: u8) -> Result<(), PlayerError>;

    fn set_playback_rate(&mut self, rate: f64) -> Result<(), PlayerError>;

    fn play(&mut self) -> Result<(), PlayerError>;

    fn pause(&mut self) -> Result<(), PlayerError>;
}
