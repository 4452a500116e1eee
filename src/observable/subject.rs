//! Hot root producer for feeding input events into a chain.

use super::registry::ObserverSet;
use super::{Observable, ObserverRef, Subscription};
use crate::error::Result;
use crate::stream::{Plain, Stream, StreamKind};
use std::cell::RefCell;
use std::rc::Rc;

/// A push source that broadcasts every `next` value to its current
/// observers, in registration order.
///
/// Subjects do not replay: an observer sees only values pushed after it
/// subscribed. Wrap the stream with `remember()` for replay.
pub struct Subject<T> {
    observers: Rc<RefCell<ObserverSet<T>>>,
}

impl<T> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Self {
            observers: self.observers.clone(),
        }
    }
}

impl<T: Clone + 'static> Default for Subject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + 'static> Subject<T> {
    pub fn new() -> Self {
        Self {
            observers: Rc::new(RefCell::new(ObserverSet::new())),
        }
    }

    /// Push a value to every registered observer.
    ///
    /// Stops at the first observer error and returns it; observers later in
    /// the order do not receive the value.
    pub fn next(&self, value: T) -> Result<()> {
        let snapshot = self.observers.borrow().snapshot();
        for (id, observer) in snapshot {
            // Skip observers removed earlier in this same pass.
            if !self.observers.borrow().contains(id) {
                continue;
            }
            observer.next(value.clone())?;
        }
        Ok(())
    }

    pub fn observer_count(&self) -> usize {
        self.observers.borrow().len()
    }

    /// A plain stream over this subject.
    pub fn stream(&self) -> Stream<T, Plain> {
        self.stream_with_kind(Plain)
    }

    /// A stream of a specific kind over this subject.
    pub fn stream_with_kind<K: StreamKind>(&self, kind: K) -> Stream<T, K> {
        let subject = self.clone();
        Stream::with_kind(move |observer| subject.subscribe(observer), kind)
    }
}

impl<T: Clone + 'static> Observable<T> for Subject<T> {
    fn subscribe(&self, observer: ObserverRef<T>) -> Result<Subscription> {
        let id = self.observers.borrow_mut().insert(observer);
        let Some(id) = id else {
            tracing::warn!("observer already subscribed to subject; ignoring duplicate");
            return Ok(Subscription::empty());
        };

        let observers = Rc::downgrade(&self.observers);
        Ok(Subscription::new(move || {
            if let Some(observers) = observers.upgrade() {
                observers.borrow_mut().remove(id);
            }
        }))
    }
}
