//! Frame-coalesced delivery.

use super::{Stream, StreamKind};
use crate::error::Result;
use crate::observable::{ObserverRef, Subscription};
use crate::scheduler::{Scheduler, TickCallback, TickToken};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Per-subscription debounce state.
struct DebounceState<T> {
    /// Most recent value not yet delivered.
    buffered: Option<T>,
    /// A tick callback is scheduled and has not fired.
    pending: bool,
    token: Option<TickToken>,
    closed: bool,
}

impl<T> DebounceState<T> {
    fn new() -> Self {
        Self {
            buffered: None,
            pending: false,
            token: None,
            closed: false,
        }
    }
}

fn flush<T: 'static>(state: Weak<RefCell<DebounceState<T>>>, observer: ObserverRef<T>) -> TickCallback {
    Box::new(move || {
        let Some(state) = state.upgrade() else {
            return Ok(());
        };
        let value = {
            let mut s = state.borrow_mut();
            s.pending = false;
            s.token = None;
            if s.closed {
                return Ok(());
            }
            s.buffered.take()
        };
        match value {
            Some(value) => observer.next(value),
            None => Ok(()),
        }
    })
}

impl<T: 'static, K: StreamKind> Stream<T, K> {
    /// Deliver at most one value per scheduler tick: the most recent one
    /// received before the tick.
    ///
    /// The first value after a delivery schedules a tick callback; values
    /// arriving while it is pending only overwrite the buffer. Unsubscribing
    /// cancels the pending callback and discards the buffer.
    pub fn debounce<S>(&self, scheduler: Rc<S>) -> Stream<T, K>
    where
        S: Scheduler + ?Sized + 'static,
    {
        let parent = self.producer.clone();
        self.derive(move |observer: ObserverRef<T>| {
            let state = Rc::new(RefCell::new(DebounceState::new()));

            let intake: ObserverRef<T> = {
                let state = state.clone();
                let scheduler = scheduler.clone();
                Rc::new(move |value: T| -> Result<()> {
                    let schedule = {
                        let mut s = state.borrow_mut();
                        if s.closed {
                            return Ok(());
                        }
                        s.buffered = Some(value);
                        let schedule = !s.pending;
                        s.pending = true;
                        schedule
                    };
                    if !schedule {
                        return Ok(());
                    }

                    let callback = flush(Rc::downgrade(&state), observer.clone());
                    match scheduler.request_tick(callback) {
                        Ok(token) => {
                            tracing::trace!(?token, "debounce: scheduled delivery");
                            let mut s = state.borrow_mut();
                            if s.pending {
                                s.token = Some(token);
                            }
                            Ok(())
                        }
                        Err(e) => {
                            state.borrow_mut().pending = false;
                            Err(e)
                        }
                    }
                })
            };

            let upstream = parent(intake)?;
            let scheduler = scheduler.clone();
            Ok(Subscription::new(move || {
                let token = {
                    let mut s = state.borrow_mut();
                    s.closed = true;
                    s.buffered = None;
                    s.pending = false;
                    s.token.take()
                };
                if let Some(token) = token {
                    scheduler.cancel(token);
                }
                upstream.unsubscribe();
            }))
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::observable::Subject;
    use crate::scheduler::ManualClock;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_burst_coalesces_to_latest() {
        let clock = Rc::new(ManualClock::new());
        let subject = Subject::<i32>::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let _sub = subject
            .stream()
            .debounce(clock.clone())
            .subscribe_fn(move |v: i32| sink.borrow_mut().push(v))
            .unwrap();

        for v in [1, 2, 3] {
            subject.next(v).unwrap();
        }
        assert!(seen.borrow().is_empty());
        assert_eq!(clock.pending(), 1);

        clock.tick().unwrap();
        assert_eq!(*seen.borrow(), vec![3]);

        // Nothing new: the next tick delivers nothing
        clock.tick().unwrap();
        assert_eq!(*seen.borrow(), vec![3]);

        subject.next(4).unwrap();
        clock.tick().unwrap();
        assert_eq!(*seen.borrow(), vec![3, 4]);
    }

    #[test]
    fn test_unsubscribe_cancels_pending_tick() {
        let clock = Rc::new(ManualClock::new());
        let subject = Subject::<i32>::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let sub = subject
            .stream()
            .debounce(clock.clone())
            .subscribe_fn(move |v: i32| sink.borrow_mut().push(v))
            .unwrap();

        subject.next(1).unwrap();
        sub.unsubscribe();

        assert_eq!(clock.pending(), 0);
        assert_eq!(subject.observer_count(), 0);
        clock.tick().unwrap();
        assert!(seen.borrow().is_empty());
    }
}
