//! Shared upstream execution with replay of the last value.

use super::{Producer, Stream, StreamKind};
use crate::error::Result;
use crate::observable::registry::ObserverSet;
use crate::observable::{ObserverRef, Subscription};
use crate::types::ObserverId;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Connection to the upstream producer.
enum Upstream {
    Idle,
    /// The first observer is subscribing upstream right now.
    Connecting,
    Connected(Subscription),
}

/// State shared by every subscriber of one `remember()` stream.
///
/// One group is allocated per `remember()` call and lives as long as the
/// stream. It holds no observers, cached value or upstream until the first
/// subscriber arrives; `last_value` doubles as the "has started" flag. When
/// the last observer leaves the group goes back to that empty state, so the
/// next first subscriber starts the upstream fresh with nothing to replay.
struct MulticastGroup<T> {
    observers: ObserverSet<T>,
    last_value: Option<T>,
    upstream: Upstream,
}

type SharedGroup<T> = Rc<RefCell<MulticastGroup<T>>>;

impl<T: Clone + 'static> MulticastGroup<T> {
    fn new() -> Self {
        Self {
            observers: ObserverSet::new(),
            last_value: None,
            upstream: Upstream::Idle,
        }
    }

    fn join(
        group: &SharedGroup<T>,
        parent: &Producer<T>,
        observer: ObserverRef<T>,
    ) -> Result<Subscription> {
        let (id, starting, replay) = {
            let mut g = group.borrow_mut();
            let Some(id) = g.observers.insert(observer.clone()) else {
                tracing::warn!("observer is already subscribed to this stream; ignoring duplicate");
                return Ok(Subscription::empty());
            };
            let starting = matches!(g.upstream, Upstream::Idle);
            if starting {
                g.upstream = Upstream::Connecting;
            }
            (id, starting, g.last_value.clone())
        };

        let membership = {
            let group = group.clone();
            Subscription::new(move || Self::leave(&group, id))
        };

        if starting {
            tracing::debug!(observer = %id, "first observer joined; starting upstream");
            Self::connect(group, parent, id)?;
        } else if let Some(value) = replay {
            if let Err(e) = observer.next(value) {
                membership.unsubscribe();
                return Err(e);
            }
        }

        Ok(membership)
    }

    /// Subscribe upstream on behalf of observer `id`.
    ///
    /// If the upstream refuses, `id` is dropped from the group. Observers
    /// that joined while the attempt was in flight are still members, so the
    /// group retries for the earliest of them until one attempt succeeds or
    /// nobody is left. The first failure is returned.
    fn connect(group: &SharedGroup<T>, parent: &Producer<T>, id: ObserverId) -> Result<()> {
        let mut connecting = id;
        let mut failure = None;
        loop {
            match parent(Self::feed(Rc::downgrade(group))) {
                Ok(subscription) => {
                    let orphaned = {
                        let mut g = group.borrow_mut();
                        if g.observers.is_empty() {
                            // Everyone left while the upstream was connecting.
                            g.reset();
                            Some(subscription)
                        } else {
                            g.upstream = Upstream::Connected(subscription);
                            None
                        }
                    };
                    if let Some(subscription) = orphaned {
                        subscription.unsubscribe();
                    }
                    break;
                }
                Err(e) => {
                    let retry = {
                        let mut g = group.borrow_mut();
                        g.observers.remove(connecting);
                        let next = g.observers.first();
                        if next.is_none() {
                            g.reset();
                        }
                        next
                    };
                    if failure.is_none() {
                        failure = Some(e);
                    } else {
                        tracing::warn!(observer = %connecting, error = %e, "upstream refused reconnect; dropping observer");
                    }
                    match retry {
                        Some(next) => {
                            tracing::debug!(observer = %next, "upstream refused; reconnecting for remaining observers");
                            connecting = next;
                        }
                        None => break,
                    }
                }
            }
        }
        failure.map_or(Ok(()), Err)
    }

    /// The observer the group registers upstream: cache, then fan out in
    /// registration order.
    fn feed(group: Weak<RefCell<Self>>) -> ObserverRef<T> {
        Rc::new(move |value: T| -> Result<()> {
            let Some(group) = group.upgrade() else {
                return Ok(());
            };
            let observers = {
                let mut g = group.borrow_mut();
                g.last_value = Some(value.clone());
                g.observers.snapshot()
            };
            for (id, observer) in observers {
                if !group.borrow().observers.contains(id) {
                    continue;
                }
                observer.next(value.clone())?;
            }
            Ok(())
        })
    }

    fn leave(group: &SharedGroup<T>, id: ObserverId) {
        let released = {
            let mut g = group.borrow_mut();
            if !g.observers.remove(id) || !g.observers.is_empty() {
                return;
            }
            match std::mem::replace(&mut g.upstream, Upstream::Idle) {
                Upstream::Connected(subscription) => {
                    g.reset();
                    Some(subscription)
                }
                // `connect` sees the empty group and cleans up.
                Upstream::Connecting => {
                    g.upstream = Upstream::Connecting;
                    None
                }
                Upstream::Idle => None,
            }
        };

        if let Some(subscription) = released {
            tracing::debug!(observer = %id, "last observer left; stopping upstream");
            subscription.unsubscribe();
        }
    }

    fn reset(&mut self) {
        self.last_value = None;
        self.upstream = Upstream::Idle;
    }
}

impl<T: Clone + 'static, K: StreamKind> Stream<T, K> {
    /// Share one upstream execution among all current subscribers and
    /// replay the last value to each new subscriber.
    ///
    /// The upstream is subscribed on the 0->1 transition in subscriber count
    /// and released on 1->0, which also clears the cached value. Subscribing
    /// the same observer object twice logs a warning and returns an empty
    /// subscription.
    pub fn remember(&self) -> Stream<T, K> {
        let parent = self.producer.clone();
        // Starts empty; see `MulticastGroup` for the activation lifecycle.
        let group = Rc::new(RefCell::new(MulticastGroup::new()));
        self.derive(move |observer| MulticastGroup::join(&group, &parent, observer))
    }
}

#[cfg(test)]
mod tests {
    use crate::observable::{observer, ObserverRef, Subject, Subscription};
    use crate::Stream;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn collect(log: &Rc<RefCell<Vec<i32>>>) -> ObserverRef<i32> {
        let log = log.clone();
        observer(move |v| {
            log.borrow_mut().push(v);
            Ok(())
        })
    }

    /// A subject-backed stream that counts upstream subscribes and releases.
    fn counted(subject: &Subject<i32>) -> (Stream<i32>, Rc<Cell<usize>>, Rc<Cell<usize>>) {
        let starts = Rc::new(Cell::new(0));
        let stops = Rc::new(Cell::new(0));
        let (s, t, subject) = (starts.clone(), stops.clone(), subject.clone());
        let stream = Stream::new(move |observer| {
            s.set(s.get() + 1);
            let inner = subject.stream().subscribe(observer)?;
            let t = t.clone();
            Ok(Subscription::new(move || {
                t.set(t.get() + 1);
                inner.unsubscribe();
            }))
        });
        (stream, starts, stops)
    }

    #[test]
    fn test_late_subscriber_gets_replay() {
        let subject = Subject::new();
        let (source, starts, stops) = counted(&subject);
        let shared = source.remember();

        let a = Rc::new(RefCell::new(Vec::new()));
        let b = Rc::new(RefCell::new(Vec::new()));

        let sub_a = shared.subscribe(collect(&a)).unwrap();
        subject.next(5).unwrap();
        let sub_b = shared.subscribe(collect(&b)).unwrap();

        assert_eq!(*b.borrow(), vec![5]);
        assert_eq!(starts.get(), 1);

        subject.next(6).unwrap();
        assert_eq!(*a.borrow(), vec![5, 6]);
        assert_eq!(*b.borrow(), vec![5, 6]);

        sub_a.unsubscribe();
        assert_eq!(stops.get(), 0);
        sub_b.unsubscribe();
        assert_eq!(stops.get(), 1);
    }

    #[test]
    fn test_restart_after_last_leaves() {
        let subject = Subject::new();
        let (source, starts, _stops) = counted(&subject);
        let shared = source.remember();

        let first = Rc::new(RefCell::new(Vec::new()));
        let sub = shared.subscribe(collect(&first)).unwrap();
        subject.next(1).unwrap();
        sub.unsubscribe();

        // No stale replay after the group was torn down
        let second = Rc::new(RefCell::new(Vec::new()));
        let _sub = shared.subscribe(collect(&second)).unwrap();
        assert!(second.borrow().is_empty());
        assert_eq!(starts.get(), 2);
    }

    #[test]
    fn test_duplicate_observer_ignored() {
        let subject = Subject::<i32>::new();
        let shared = subject.stream().remember();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let obs = collect(&seen);
        let _first = shared.subscribe(obs.clone()).unwrap();
        let dup = shared.subscribe(obs).unwrap();
        assert!(dup.is_empty());

        subject.next(3).unwrap();
        assert_eq!(*seen.borrow(), vec![3]);

        // Releasing the duplicate handle leaves the original registration
        dup.unsubscribe();
        subject.next(4).unwrap();
        assert_eq!(*seen.borrow(), vec![3, 4]);
    }

    #[test]
    fn test_synchronous_upstream_reaches_first_subscriber() {
        let shared = Stream::of([1, 2]).remember();
        let a = Rc::new(RefCell::new(Vec::new()));
        let _sub = shared.subscribe(collect(&a)).unwrap();
        assert_eq!(*a.borrow(), vec![1, 2]);

        let b = Rc::new(RefCell::new(Vec::new()));
        let _sub_b = shared.subscribe(collect(&b)).unwrap();
        assert_eq!(*b.borrow(), vec![2]);
    }
}
