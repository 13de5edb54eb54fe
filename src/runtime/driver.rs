//! Fixed-interval polling loop around an [`Engine`].

use std::ops::ControlFlow;
use std::time::Duration;

use tracing::debug;

use super::clock::Clock;
use crate::engine::{Engine, Notifier};
use crate::player::Player;

/// Default poll interval, roughly one display frame.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(16);

/// Calls [`Engine::poll`] every `interval` on a [`Clock`].
#[derive(Debug, Clone)]
pub struct Driver<C: Clock> {
    clock: C,
    interval: Duration,
}

impl<C: Clock> Driver<C> {
    pub fn new(clock: C, interval: Duration) -> Self {
        let interval = if interval.is_zero() {
            DEFAULT_POLL_INTERVAL
        } else {
            interval
        };
        Self { clock, interval }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Poll until `on_frame` breaks.
    ///
    /// Frames are `interval` apart, except that the loop wakes early for a
    /// pending timer so pauses and jumps fire on time.
    ///
    /// `on_frame` runs after every poll with the engine and the frame time,
    /// and is where hosts inject input or check for a stop request.
    /// Returns the number of frames polled.
    pub fn run<P, N, F>(&self, engine: &mut Engine<P, N>, mut on_frame: F) -> u64
    where
        P: Player,
        N: Notifier,
        F: FnMut(&mut Engine<P, N>, Duration) -> ControlFlow<()>,
    {
        let mut frames = 0;
        loop {
            let now = self.clock.now();
            engine.poll(now);
            frames += 1;
            if on_frame(engine, now).is_break() {
                break;
            }
            self.clock.sleep(self.wait_after(engine.next_deadline(), now));
        }
        debug!(frames, "polling loop stopped");
        frames
    }

    /// Time until the next frame: one interval, or less when a timer falls
    /// due sooner.
    fn wait_after(&self, deadline: Option<Duration>, now: Duration) -> Duration {
        match deadline {
            Some(due) if due > now => (due - now).min(self.interval),
            _ => self.interval,
        }
    }
}
