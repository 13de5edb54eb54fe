//! In-memory player used for simulation and tests.
//!
//! Position advances with the supplied clock while playing, scaled by the
//! (quantized) playback rate, and stops at the end of the video. Every
//! command the engine issues is recorded so callers can assert on the exact
//! sequence of transport and settings changes.

use std::time::Duration;

use super::{Player, PlayerError, PlayerState};
use crate::runtime::Clock;

/// Rates the simulated player supports; requests snap to the nearest one.
pub const SUPPORTED_RATES: [f64; 8] = [0.25, 0.5, 0.75, 1.0, 1.25, 1.5, 1.75, 2.0];

/// A command issued to the player, in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerCommand {
    Seek { to: f64, allow_buffer_reload: bool },
    SetVolume(u8),
    SetRate { requested: f64, applied: f64 },
    Play,
    Pause,
}

/// Snap `rate` to the nearest supported rate (ties go to the slower one).
fn quantize_rate(rate: f64) -> f64 {
    SUPPORTED_RATES
        .iter()
        .copied()
        .fold(SUPPORTED_RATES[0], |best, candidate| {
            if (candidate - rate).abs() < (best - rate).abs() {
                candidate
            } else {
                best
            }
        })
}

/// Player whose position is derived from a [`Clock`].
#[derive(Debug)]
pub struct SimulatedPlayer<C: Clock> {
    clock: C,
    length: f64,
    ready: bool,
    reject_commands: bool,
    state: PlayerState,
    // Position at `anchor_time`; while playing, position grows from here
    anchor_position: f64,
    anchor_time: Duration,
    volume: u8,
    rate: f64,
    commands: Vec<PlayerCommand>,
}

impl<C: Clock> SimulatedPlayer<C> {
    /// Create a cued player for a video `length` seconds long.
    pub fn new(clock: C, length: f64) -> Self {
        let anchor_time = clock.now();
        Self {
            clock,
            length: length.max(0.0),
            ready: true,
            reject_commands: false,
            state: PlayerState::Cued,
            anchor_position: 0.0,
            anchor_time,
            volume: 100,
            rate: 1.0,
            commands: Vec::new(),
        }
    }

    /// Start from the given volume and rate without recording commands.
    pub fn with_settings(mut self, volume: u8, rate: f64) -> Self {
        self.volume = volume.min(100);
        self.rate = quantize_rate(rate);
        self
    }

    /// Simulate the embed becoming (un)available. While not ready every call fails.
    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    /// While set, reads keep working but every command fails.
    pub fn set_reject_commands(&mut self, reject: bool) {
        self.reject_commands = reject;
    }

    /// Move the playhead as a user scrubbing the timeline would.
    ///
    /// Not recorded as a command: the engine did not issue it.
    pub fn user_seek(&mut self, to: f64) {
        self.rebase();
        self.anchor_position = to.clamp(0.0, self.length);
    }

    /// Change volume and rate as a user would from the player's own controls.
    pub fn user_adjust(&mut self, volume: u8, rate: f64) {
        self.rebase();
        self.volume = volume.min(100);
        self.rate = quantize_rate(rate);
    }

    /// Commands issued so far.
    pub fn commands(&self) -> &[PlayerCommand] {
        &self.commands
    }

    /// Drain the command log.
    pub fn take_commands(&mut self) -> Vec<PlayerCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Video length in seconds.
    pub fn length(&self) -> f64 {
        self.length
    }

    fn position(&self) -> f64 {
        if self.state == PlayerState::Playing {
            let elapsed = self.clock.now().saturating_sub(self.anchor_time);
            (self.anchor_position + elapsed.as_secs_f64() * self.rate).min(self.length)
        } else {
            self.anchor_position
        }
    }

    /// Fold elapsed playback into the anchor so settings changes apply from now on.
    fn rebase(&mut self) {
        self.anchor_position = self.position();
        self.anchor_time = self.clock.now();
        if self.state == PlayerState::Playing && self.anchor_position >= self.length {
            self.state = PlayerState::Ended;
        }
    }

    fn ensure_ready(&self) -> Result<(), PlayerError> {
        if self.ready {
            Ok(())
        } else {
            Err(PlayerError::NotReady)
        }
    }

    fn ensure_accepts(&self, call: &'static str) -> Result<(), PlayerError> {
        self.ensure_ready()?;
        if self.reject_commands {
            return Err(PlayerError::CallFailed {
                call,
                message: "command rejected".to_string(),
            });
        }
        Ok(())
    }
}

impl<C: Clock> Player for SimulatedPlayer<C> {
    fn current_time(&self) -> Result<f64, PlayerError> {
        self.ensure_ready()?;
        Ok(self.position())
    }

    fn volume(&self) -> Result<u8, PlayerError> {
        self.ensure_ready()?;
        Ok(self.volume)
    }

    fn playback_rate(&self) -> Result<f64, PlayerError> {
        self.ensure_ready()?;
        Ok(self.rate)
    }

    fn state(&self) -> Result<PlayerState, PlayerError> {
        self.ensure_ready()?;
        if self.state == PlayerState::Playing && self.position() >= self.length {
            return Ok(PlayerState::Ended);
        }
        Ok(self.state)
    }

    fn seek_to(&mut self, seconds: f64, allow_buffer_reload: bool) -> Result<(), PlayerError> {
        self.ensure_accepts("seek_to")?;
        self.rebase();
        self.anchor_position = seconds.clamp(0.0, self.length);
        if self.state == PlayerState::Ended && self.anchor_position < self.length {
            self.state = PlayerState::Paused;
        }
        self.commands.push(PlayerCommand::Seek {
            to: seconds,
            allow_buffer_reload,
        });
        Ok(())
    }

    fn set_volume(&mut self, volume: u8) -> Result<(), PlayerError> {
        self.ensure_accepts("set_volume")?;
        self.volume = volume.min(100);
        self.commands.push(PlayerCommand::SetVolume(volume));
        Ok(())
    }

    fn set_playback_rate(&mut self, rate: f64) -> Result<(), PlayerError> {
        self.ensure_accepts("set_playback_rate")?;
        self.rebase();
        let applied = quantize_rate(rate);
        self.rate = applied;
        self.commands.push(PlayerCommand::SetRate {
            requested: rate,
            applied,
        });
        Ok(())
    }

    fn play(&mut self) -> Result<(), PlayerError> {
        self.ensure_accepts("play")?;
        self.rebase();
        if self.anchor_position < self.length {
            self.state = PlayerState::Playing;
        }
        self.commands.push(PlayerCommand::Play);
        Ok(())
    }

    fn pause(&mut self) -> Result<(), PlayerError> {
        self.ensure_accepts("pause")?;
        self.rebase();
        if self.state != PlayerState::Ended {
            self.state = PlayerState::Paused;
        }
        self.commands.push(PlayerCommand::Pause);
        Ok(())
    }
}
