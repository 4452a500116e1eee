//! Streams and the operator engine.
//!
//! A [`Stream`] wraps a producer: a function from an observer to a
//! [`Subscription`]. Building a chain never runs anything; every operator
//! returns a new stream whose producer subscribes to its parent when it is
//! itself subscribed. Values flow depth-first and synchronously through the
//! chain, so a value pushed at the root reaches every live subscriber before
//! the push returns. `debounce` is the one exception: it delivers on the
//! next tick of an injected [`Scheduler`](crate::scheduler::Scheduler).
//!
//! Cold vs. shared:
//! - Plain operators re-run their upstream once per subscriber.
//! - `remember` and `dedupe` share one upstream execution across all
//!   current subscribers and replay the last value to late joiners.
//!
//! Stream kinds: every stream carries a kind value `K`. Operators build
//! their result through [`StreamKind::derive`], so a stream created with a
//! specialised kind keeps that kind, and any methods implemented for
//! `Stream<_, ThatKind>`, after any chain of operators.
//!
//! # Example
//!
//! ```ignore
//! let clock = Rc::new(ManualClock::new());
//! let pointer = Subject::new();
//!
//! let opacity = pointer
//!     .stream()
//!     .pluck("clientX")
//!     .map(|x: Value| x.as_f64().unwrap_or(0.0))
//!     .map_range(MapRange::new(0.0, 200.0).to(1.0, 0.0))
//!     .debounce(clock.clone());
//!
//! let sub = opacity.subscribe_fn(|o| println!("opacity {o}"))?;
//! pointer.next(json!({"clientX": 50}))?;
//! clock.tick()?;
//! sub.unsubscribe();
//! ```

mod debounce;
mod dedupe;
mod merge;
mod multicast;
mod tap;
mod transforms;

pub use transforms::Invertible;

use crate::error::Result;
use crate::observable::{Observable, ObserverRef, Subscription};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// The function a stream runs for every subscribe call.
pub type Producer<T> = Rc<dyn Fn(ObserverRef<T>) -> Result<Subscription>>;

/// Virtual constructor for streams.
///
/// Operators never construct a `Stream` directly; they ask the kind of the
/// stream they were invoked on to derive a new one. The default clones the
/// kind. Override `derive` to wrap every producer in a chain, for example to
/// instrument subscriptions.
pub trait StreamKind: Clone + fmt::Debug + 'static {
    fn derive<U: 'static>(&self, producer: Producer<U>) -> Stream<U, Self> {
        Stream::from_producer(producer, self.clone())
    }
}

/// The kind of streams with no specialised capabilities.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Plain;

impl StreamKind for Plain {}

/// Forwards transformed values to the downstream observer.
pub struct Dispatch<U> {
    observer: ObserverRef<U>,
}

impl<U> Dispatch<U> {
    pub fn send(&self, value: U) -> Result<()> {
        self.observer.next(value)
    }
}

/// An immutable, chainable description of a push-based value source.
pub struct Stream<T, K = Plain> {
    producer: Producer<T>,
    kind: K,
}

impl<T, K: Clone> Clone for Stream<T, K> {
    fn clone(&self) -> Self {
        Self {
            producer: self.producer.clone(),
            kind: self.kind.clone(),
        }
    }
}

impl<T, K: fmt::Debug> fmt::Debug for Stream<T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stream").field("kind", &self.kind).finish()
    }
}

impl<T: 'static> Stream<T, Plain> {
    /// Create a plain stream from a producer function.
    pub fn new<P>(producer: P) -> Self
    where
        P: Fn(ObserverRef<T>) -> Result<Subscription> + 'static,
    {
        Self::with_kind(producer, Plain)
    }

    /// Wrap any observable as a plain stream.
    pub fn from_observable<O>(source: O) -> Self
    where
        O: Observable<T> + 'static,
    {
        Self::new(move |observer| source.subscribe(observer))
    }

    /// A cold stream that emits `values`, in order, to each subscriber
    /// during its subscribe call.
    pub fn of<I>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Clone,
    {
        let values: Rc<[T]> = values.into_iter().collect();
        Self::new(move |observer| {
            for value in values.iter() {
                observer.next(value.clone())?;
            }
            Ok(Subscription::empty())
        })
    }

    /// A stream that never emits.
    pub fn never() -> Self {
        Self::new(|_| Ok(Subscription::empty()))
    }
}

impl<T: 'static, K: StreamKind> Stream<T, K> {
    /// Create a stream of kind `kind` from a producer function.
    pub fn with_kind<P>(producer: P, kind: K) -> Self
    where
        P: Fn(ObserverRef<T>) -> Result<Subscription> + 'static,
    {
        Self::from_producer(Rc::new(producer), kind)
    }

    /// Assemble a stream from an already shared producer. Used by
    /// [`StreamKind::derive`] implementations.
    pub fn from_producer(producer: Producer<T>, kind: K) -> Self {
        Self { producer, kind }
    }

    pub fn kind(&self) -> &K {
        &self.kind
    }

    pub fn into_kind(self) -> K {
        self.kind
    }

    /// Start an execution of this stream for `observer`.
    ///
    /// Errors raised while subscribing (a cold producer or a replaying
    /// multicast group dispatching synchronously) are returned here.
    pub fn subscribe(&self, observer: ObserverRef<T>) -> Result<Subscription> {
        (self.producer)(observer)
    }

    /// Subscribe with an infallible closure.
    pub fn subscribe_fn<F>(&self, f: F) -> Result<Subscription>
    where
        F: Fn(T) + 'static,
    {
        self.subscribe(Rc::new(move |value: T| -> Result<()> {
            f(value);
            Ok(())
        }))
    }

    /// Build a sibling stream of the same kind around `producer`.
    pub fn derive<U, P>(&self, producer: P) -> Stream<U, K>
    where
        U: 'static,
        P: Fn(ObserverRef<U>) -> Result<Subscription> + 'static,
    {
        self.kind.derive(Rc::new(producer))
    }

    /// The operator engine.
    ///
    /// The returned stream subscribes to this one and runs `transform` once
    /// per received value; `transform` forwards zero or more values through
    /// the [`Dispatch`]. Unsubscribing releases the parent subscription.
    pub fn operator<U, F>(&self, transform: F) -> Stream<U, K>
    where
        U: 'static,
        F: Fn(T, &Dispatch<U>) -> Result<()> + 'static,
    {
        let parent = self.producer.clone();
        let transform = Rc::new(transform);
        self.derive(move |observer| {
            let dispatch = Dispatch { observer };
            let transform = transform.clone();
            parent(Rc::new(move |value: T| transform(value, &dispatch)))
        })
    }

    /// Like [`operator`](Self::operator), with a state value created by
    /// `init` for each subscription and dropped when it is released.
    ///
    /// `transform` must not hold a borrow of the state across
    /// `Dispatch::send`; a downstream observer may feed a value back in.
    pub fn operator_with<U, S, I, F>(&self, init: I, transform: F) -> Stream<U, K>
    where
        U: 'static,
        S: 'static,
        I: Fn() -> S + 'static,
        F: Fn(&RefCell<S>, T, &Dispatch<U>) -> Result<()> + 'static,
    {
        let parent = self.producer.clone();
        let transform = Rc::new(transform);
        self.derive(move |observer| {
            let state = RefCell::new(init());
            let dispatch = Dispatch { observer };
            let transform = transform.clone();
            parent(Rc::new(move |value: T| transform(&state, value, &dispatch)))
        })
    }
}

impl<T: 'static, K: StreamKind> Observable<T> for Stream<T, K> {
    fn subscribe(&self, observer: ObserverRef<T>) -> Result<Subscription> {
        Stream::subscribe(self, observer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observable::{observer, Subject};
    use std::cell::Cell;

    fn collect<T: 'static>(log: &Rc<RefCell<Vec<T>>>) -> ObserverRef<T> {
        let log = log.clone();
        observer(move |v| {
            log.borrow_mut().push(v);
            Ok(())
        })
    }

    #[test]
    fn test_building_a_chain_runs_nothing() {
        let runs = Rc::new(Cell::new(0));
        let r = runs.clone();
        let source = Stream::new(move |_: ObserverRef<i32>| {
            r.set(r.get() + 1);
            Ok(Subscription::empty())
        });

        let chained = source.map(|x: i32| x + 1).filter(|x| *x > 0);
        assert_eq!(runs.get(), 0);

        chained.subscribe_fn(|_| {}).unwrap().unsubscribe();
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn test_cold_stream_runs_per_subscriber() {
        let runs = Rc::new(Cell::new(0));
        let r = runs.clone();
        let source = Stream::new(move |observer: ObserverRef<i32>| {
            r.set(r.get() + 1);
            observer.next(1)?;
            Ok(Subscription::empty())
        })
        .map(|x| x * 10);

        let a = Rc::new(RefCell::new(Vec::new()));
        let b = Rc::new(RefCell::new(Vec::new()));
        let _sa = source.subscribe(collect(&a)).unwrap();
        let _sb = source.subscribe(collect(&b)).unwrap();

        assert_eq!(runs.get(), 2);
        assert_eq!(*a.borrow(), vec![10]);
        assert_eq!(*b.borrow(), vec![10]);
    }

    #[test]
    fn test_operator_with_state_is_per_subscription() {
        let subject = Subject::new();
        let counted = subject.stream().operator_with(
            || 0usize,
            |count, value: &'static str, out| {
                let n = {
                    let mut count = count.borrow_mut();
                    *count += 1;
                    *count
                };
                out.send(format!("{value}#{n}"))
            },
        );

        let a = Rc::new(RefCell::new(Vec::new()));
        let sub_a = counted.subscribe(collect(&a)).unwrap();
        subject.next("x").unwrap();

        let b = Rc::new(RefCell::new(Vec::new()));
        let _sub_b = counted.subscribe(collect(&b)).unwrap();
        subject.next("y").unwrap();
        sub_a.unsubscribe();

        assert_eq!(*a.borrow(), vec!["x#1", "y#2"]);
        assert_eq!(*b.borrow(), vec!["y#1"]);
    }

    #[test]
    fn test_unsubscribe_releases_parent() {
        let subject = Subject::<i32>::new();
        let sub = subject.stream().map(|x: i32| x).subscribe_fn(|_| {}).unwrap();
        assert_eq!(subject.observer_count(), 1);

        sub.unsubscribe();
        assert_eq!(subject.observer_count(), 0);
    }

    #[test]
    fn test_from_observable_and_of() {
        let subject = Subject::<i32>::new();
        let wrapped = Stream::from_observable(subject.clone());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let _sub = wrapped.subscribe(collect(&seen)).unwrap();
        subject.next(4).unwrap();
        assert_eq!(*seen.borrow(), vec![4]);

        let replayed = Rc::new(RefCell::new(Vec::new()));
        let _sub = Stream::of([1, 2, 3]).subscribe(collect(&replayed)).unwrap();
        assert_eq!(*replayed.borrow(), vec![1, 2, 3]);
    }
}
