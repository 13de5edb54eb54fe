//! Notecue - time-coded playback directives for video notes
//!
//! Notes carry directives like `[00:01:05-00:01:20, 50%, 1.25x, ->]`. The
//! [`engine`] watches a [`player::Player`] and, while the playhead is inside
//! a directive's window, applies its volume and speed, runs its pause or
//! auto-jump, and restores settings afterwards.

pub mod cli;
pub mod config;
pub mod directive;
pub mod engine;
pub mod player;
pub mod runtime;

pub use config::Config;
pub use directive::{parse, Action, ActivationPoint, PlaybackSettings, Segment};
pub use engine::{Engine, EngineConfig, EngineError, EngineEvent, Notification, Notifier};
pub use player::{Player, PlayerError, PlayerState};
