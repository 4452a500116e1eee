//! Frame scheduling for `debounce`.
//!
//! The engine never owns a clock. A host injects a [`Scheduler`] that runs a
//! callback on its next frame (an animation-frame hook, a render loop tick,
//! a timer). [`ManualClock`] is a queue-backed scheduler for hosts that drive
//! frames themselves and for tests.

mod manual;

pub use manual::ManualClock;

use crate::error::Result;
use std::fmt;

/// Identifies one scheduled callback.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickToken(pub u64);

impl fmt::Debug for TickToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TickToken({})", self.0)
    }
}

/// A callback run on the next tick. Errors are returned to the tick driver.
pub type TickCallback = Box<dyn FnOnce() -> Result<()>>;

/// Host frame-scheduling primitive.
pub trait Scheduler {
    /// Run `callback` once on the next tick.
    fn request_tick(&self, callback: TickCallback) -> Result<TickToken>;

    /// Best-effort cancellation of a callback that has not run yet.
    fn cancel(&self, _token: TickToken) {}
}
