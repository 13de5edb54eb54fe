//! Engine errors.

use crate::player::PlayerError;

/// Errors returned by direct engine calls such as explicit activation.
///
/// Scheduler ticks never return errors: failures there are reported as
/// notifications and the next tick tries again.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Player(#[from] PlayerError),

    #[error("No segment with index {0}")]
    UnknownSegment(usize),
}
