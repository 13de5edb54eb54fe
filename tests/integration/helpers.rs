//! Shared helpers for integration tests

use std::path::PathBuf;
use std::time::Duration;

use notecue::engine::{Engine, EngineConfig, EngineEvent, Notification};
use notecue::player::{Player, SimulatedPlayer};
use notecue::runtime::{Clock, ManualClock};

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

pub fn load_fixture(name: &str) -> String {
    let path = fixtures_dir().join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e))
}

/// Engine on a manual clock driving a playing simulated player.
pub struct Scenario {
    pub clock: ManualClock,
    pub engine: Engine<SimulatedPlayer<ManualClock>, Vec<Notification>>,
}

impl Scenario {
    pub fn new(text: &str) -> Self {
        Self::with_config(text, EngineConfig::default())
    }

    pub fn with_config(text: &str, config: EngineConfig) -> Self {
        let clock = ManualClock::new();
        let mut player = SimulatedPlayer::new(clock.clone(), 3600.0);
        player.play().expect("simulated player starts");
        let mut engine = Engine::new(player, Vec::new(), config);
        engine.set_text(text);
        Self { clock, engine }
    }

    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    pub fn position(&self) -> f64 {
        self.engine.player().current_time().expect("player ready")
    }

    pub fn user_seek(&mut self, to: f64) {
        self.engine.player_mut().user_seek(to);
    }

    pub fn poll(&mut self) {
        let now = self.clock.now();
        self.engine.poll(now);
    }

    /// Poll every 16ms for `millis` ms.
    pub fn play_for(&mut self, millis: u64) {
        let mut elapsed = 0;
        while elapsed < millis {
            self.clock.advance_ms(16);
            self.poll();
            elapsed += 16;
        }
    }

    pub fn events(&self) -> Vec<EngineEvent> {
        self.engine.notifier().iter().map(|n| n.event.clone()).collect()
    }

    pub fn entered(&self) -> Vec<usize> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                EngineEvent::Entered { index, .. } => Some(index),
                _ => None,
            })
            .collect()
    }
}
