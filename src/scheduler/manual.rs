//! Queue-backed frame clock driven by explicit `tick` calls.

use super::{Scheduler, TickCallback, TickToken};
use crate::error::Result;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

/// A scheduler whose frames advance only when [`ManualClock::tick`] is
/// called.
pub struct ManualClock {
    queue: RefCell<VecDeque<(TickToken, TickCallback)>>,
    next_token: Cell<u64>,
    frame: Cell<u64>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            queue: RefCell::new(VecDeque::new()),
            next_token: Cell::new(1),
            frame: Cell::new(0),
        }
    }

    /// Number of callbacks waiting for the next tick.
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Frames completed so far.
    pub fn frame(&self) -> u64 {
        self.frame.get()
    }

    /// Advance one frame, running every callback queued before this call.
    ///
    /// Callbacks scheduled while the tick runs wait for the next tick. If a
    /// callback fails the tick stops there; callbacks not yet run stay
    /// queued ahead of any newly scheduled ones.
    pub fn tick(&self) -> Result<usize> {
        let mut batch: VecDeque<_> = self.queue.borrow_mut().drain(..).collect();
        let mut ran = 0;

        while let Some((token, callback)) = batch.pop_front() {
            tracing::trace!(?token, "running tick callback");
            if let Err(e) = callback() {
                let mut queue = self.queue.borrow_mut();
                for entry in batch.into_iter().rev() {
                    queue.push_front(entry);
                }
                return Err(e);
            }
            ran += 1;
        }

        self.frame.set(self.frame.get() + 1);
        Ok(ran)
    }
}

impl Scheduler for ManualClock {
    fn request_tick(&self, callback: TickCallback) -> Result<TickToken> {
        let token = TickToken(self.next_token.get());
        self.next_token.set(token.0 + 1);
        self.queue.borrow_mut().push_back((token, callback));
        Ok(token)
    }

    fn cancel(&self, token: TickToken) {
        self.queue.borrow_mut().retain(|(t, _)| *t != token);
    }
}
