//! Clocks and the polling loop that drive an engine.

mod clock;
mod driver;

pub use clock::{Clock, ManualClock, SystemClock};
pub use driver::{Driver, DEFAULT_POLL_INTERVAL};
