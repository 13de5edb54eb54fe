//! Cancellable deferred work, one outstanding task per subsystem.
//!
//! Each [`TimerSlot`] holds at most one task. Scheduling into an occupied
//! slot replaces (and returns) the old task, so a stale auto-jump or
//! pause-resume can never fire against state that has moved on.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::directive::Segment;

/// Subsystem that owns a deferred task.
///
/// Ordering doubles as the tie-break when two tasks fall due at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimerSlot {
    EntryGuard,
    ExitGuard,
    PauseResume,
    AutoJump,
    SettleRestore,
}

/// Work to run when a timer falls due.
#[derive(Debug, Clone, PartialEq)]
pub enum Deferred {
    ReleaseEntryGuard,
    ReleaseExitGuard,
    ResumeAfterPause { seconds: u32 },
    AutoJump { origin: Segment },
    SettleRestore,
}

impl Deferred {
    /// The slot this task occupies.
    pub fn slot(&self) -> TimerSlot {
        match self {
            Deferred::ReleaseEntryGuard => TimerSlot::EntryGuard,
            Deferred::ReleaseExitGuard => TimerSlot::ExitGuard,
            Deferred::ResumeAfterPause { .. } => TimerSlot::PauseResume,
            Deferred::AutoJump { .. } => TimerSlot::AutoJump,
            Deferred::SettleRestore => TimerSlot::SettleRestore,
        }
    }
}

/// Identity of one scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

/// A task waiting in its slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Scheduled {
    pub id: TimerId,
    pub due: Duration,
    pub task: Deferred,
}

/// Deferred tasks keyed by [`TimerSlot`].
#[derive(Debug, Default)]
pub struct Timers {
    slots: BTreeMap<TimerSlot, Scheduled>,
    next_id: u64,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `task` at `due`, replacing whatever occupied its slot.
    ///
    /// Returns the new task's id and the superseded task, if any.
    pub fn schedule(&mut self, due: Duration, task: Deferred) -> (TimerId, Option<Scheduled>) {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let previous = self.slots.insert(task.slot(), Scheduled { id, due, task });
        (id, previous)
    }

    /// Cancel the task in `slot`.
    pub fn cancel(&mut self, slot: TimerSlot) -> Option<Scheduled> {
        self.slots.remove(&slot)
    }

    pub fn get(&self, slot: TimerSlot) -> Option<&Scheduled> {
        self.slots.get(&slot)
    }

    pub fn is_pending(&self, slot: TimerSlot) -> bool {
        self.slots.contains_key(&slot)
    }

    /// Earliest due time across all slots.
    pub fn next_due(&self) -> Option<Duration> {
        self.slots.values().map(|s| s.due).min()
    }

    /// Remove and return the earliest task due at or before `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<Scheduled> {
        let slot = self
            .slots
            .iter()
            .filter(|(_, scheduled)| scheduled.due <= now)
            .min_by_key(|(slot, scheduled)| (scheduled.due, **slot))
            .map(|(slot, _)| *slot)?;
        self.slots.remove(&slot)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn scheduling_same_slot_supersedes() {
        let mut timers = Timers::new();
        let (first, none) = timers.schedule(ms(100), Deferred::ResumeAfterPause { seconds: 1 });
        assert!(none.is_none());

        let (second, replaced) =
            timers.schedule(ms(300), Deferred::ResumeAfterPause { seconds: 3 });
        let replaced = replaced.expect("first task replaced");
        assert_eq!(replaced.id, first);
        assert_ne!(first, second);
        assert_eq!(timers.len(), 1);
        assert_eq!(timers.get(TimerSlot::PauseResume).map(|s| s.due), Some(ms(300)));
    }

    #[test]
    fn pop_due_returns_earliest_first() {
        let mut timers = Timers::new();
        timers.schedule(ms(200), Deferred::ReleaseExitGuard);
        timers.schedule(ms(100), Deferred::ReleaseEntryGuard);
        timers.schedule(ms(500), Deferred::SettleRestore);

        assert!(timers.pop_due(ms(50)).is_none());
        assert_eq!(timers.pop_due(ms(250)).map(|s| s.task), Some(Deferred::ReleaseEntryGuard));
        assert_eq!(timers.pop_due(ms(250)).map(|s| s.task), Some(Deferred::ReleaseExitGuard));
        assert!(timers.pop_due(ms(250)).is_none());
        assert_eq!(timers.next_due(), Some(ms(500)));
    }

    #[test]
    fn ties_break_by_slot_order() {
        let mut timers = Timers::new();
        timers.schedule(ms(100), Deferred::SettleRestore);
        timers.schedule(ms(100), Deferred::ReleaseEntryGuard);
        assert_eq!(timers.pop_due(ms(100)).map(|s| s.task), Some(Deferred::ReleaseEntryGuard));
    }

    #[test]
    fn cancel_removes_only_its_slot() {
        let mut timers = Timers::new();
        timers.schedule(ms(100), Deferred::ReleaseEntryGuard);
        timers.schedule(ms(100), Deferred::SettleRestore);
        assert!(timers.cancel(TimerSlot::EntryGuard).is_some());
        assert!(timers.cancel(TimerSlot::EntryGuard).is_none());
        assert!(timers.is_pending(TimerSlot::SettleRestore));
        assert!(timers.cancel(TimerSlot::SettleRestore).is_some());
        assert!(timers.is_empty());
        assert_eq!(timers.next_due(), None);
    }
}
