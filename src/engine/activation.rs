//! Explicit activation.
//!
//! A user activating a directive (clicking it, or its end half) jumps
//! straight into that segment, ignoring the watermark, and runs its action
//! from there. Segments after it become eligible again.

use std::time::Duration;

use tracing::info;

use super::error::EngineError;
use super::notify::EngineEvent;
use super::state::EntryKind;
use super::{Engine, Notifier};
use crate::directive::{segment_at_offset, ActivationPoint, Segment};
use crate::player::{Player, PlayerError};

impl<P: Player, N: Notifier> Engine<P, N> {
    /// Activate the segment with `sequence_index` at `point`.
    pub fn activate(
        &mut self,
        sequence_index: usize,
        point: ActivationPoint,
        now: Duration,
    ) -> Result<(), EngineError> {
        let segment = self
            .cache
            .get(sequence_index)
            .cloned()
            .ok_or(EngineError::UnknownSegment(sequence_index))?;
        self.activate_segment(segment, point, now)
    }

    /// Activate whatever directive covers byte `offset` of the note text.
    ///
    /// Returns the activated index and point, or `None` when the offset is
    /// outside every directive.
    pub fn activate_at_offset(
        &mut self,
        offset: usize,
        now: Duration,
    ) -> Result<Option<(usize, ActivationPoint)>, EngineError> {
        let Some((segment, point)) = segment_at_offset(self.cache.segments(), offset)
            .map(|(segment, point)| (segment.clone(), point))
        else {
            return Ok(None);
        };
        let index = segment.sequence_index;
        self.activate_segment(segment, point, now)?;
        Ok(Some((index, point)))
    }

    /// Activate `segment` at `point`.
    ///
    /// The engine's own seek is shielded from the manual-seek detector. On a
    /// player failure the guards are released and the error is returned.
    pub fn activate_segment(
        &mut self,
        segment: Segment,
        point: ActivationPoint,
        now: Duration,
    ) -> Result<(), EngineError> {
        self.state.suppress_manual_seek_until =
            Some(now.saturating_add(self.config.suppress_window));
        match self.try_activate(&segment, point, now) {
            Ok(()) => Ok(()),
            Err(err) => {
                self.fail_transition("activation", err.clone());
                Err(err.into())
            }
        }
    }

    fn try_activate(
        &mut self,
        segment: &Segment,
        point: ActivationPoint,
        now: Duration,
    ) -> Result<(), PlayerError> {
        self.capture_prior_settings()?;
        let settings = segment.settings();
        self.apply_settings(settings)?;

        let target_time = match point {
            ActivationPoint::Start => segment.start_time,
            ActivationPoint::End => segment.end_time,
        };
        self.seek_and_play(target_time)?;

        self.supersede_actions();
        self.state.active_segment = Some(segment.clone());
        self.state.entered_via = EntryKind::Explicit;
        self.state.last_consumed_index = segment.sequence_index as i64 - 1;
        self.observed = settings;

        info!(index = segment.sequence_index, %point, target_time, "activated segment");
        self.emit(EngineEvent::Activated {
            index: segment.sequence_index,
            point,
            target_time,
            settings,
        });

        self.start_action(segment, target_time, now)
    }
}
