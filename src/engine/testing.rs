//! Shared fixture for engine unit tests.

use std::time::Duration;

use super::{Engine, EngineConfig, EngineEvent, Notification};
use crate::player::{Player, SimulatedPlayer};
use crate::runtime::{Clock, ManualClock};

/// An engine driving a playing [`SimulatedPlayer`] on a manual clock.
pub struct Harness {
    pub clock: ManualClock,
    pub engine: Engine<SimulatedPlayer<ManualClock>, Vec<Notification>>,
}

impl Harness {
    pub fn new(text: &str) -> Self {
        Self::with_config(text, EngineConfig::default())
    }

    pub fn with_config(text: &str, config: EngineConfig) -> Self {
        let clock = ManualClock::new();
        let mut player = SimulatedPlayer::new(clock.clone(), 600.0);
        player.play().unwrap();
        player.take_commands();
        let mut engine = Engine::new(player, Vec::new(), config);
        engine.set_text(text);
        Self { clock, engine }
    }

    pub fn clock_now(&self) -> Duration {
        self.clock.now()
    }

    /// Playhead position.
    pub fn time(&self) -> f64 {
        self.engine.player().current_time().unwrap()
    }

    /// Move the playhead without the engine's involvement.
    pub fn seek(&mut self, to: f64) {
        self.engine.player_mut().user_seek(to);
    }

    pub fn poll(&mut self) {
        let now = self.clock.now();
        self.engine.poll(now);
    }

    /// Advance the clock by `millis` and poll once.
    pub fn step(&mut self, millis: u64) {
        self.clock.advance_ms(millis);
        self.poll();
    }

    /// Poll every `frame` ms for `millis` ms.
    pub fn run_for(&mut self, millis: u64, frame: u64) {
        let mut elapsed = 0;
        while elapsed < millis {
            self.step(frame);
            elapsed += frame;
        }
    }

    pub fn events(&self) -> Vec<&EngineEvent> {
        self.engine.notifier().iter().map(|n| &n.event).collect()
    }

    pub fn count(&self, pred: impl Fn(&EngineEvent) -> bool) -> usize {
        self.engine
            .notifier()
            .iter()
            .filter(|n| pred(&n.event))
            .count()
    }
}
