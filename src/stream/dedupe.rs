//! Suppression of consecutive equal values.

use super::{Stream, StreamKind};
use crate::error::Result;

/// Per-execution dedupe state. `last_value` being set means at least one
/// value has been dispatched.
struct DedupeState<T> {
    last_value: Option<T>,
}

impl<T> DedupeState<T> {
    fn new() -> Self {
        Self { last_value: None }
    }
}

impl<T: Clone + 'static, K: StreamKind> Stream<T, K> {
    /// Drop values equal (by `PartialEq`) to the previously dispatched one.
    ///
    /// For `serde_json::Value` this is deep structural equality.
    pub fn dedupe(&self) -> Stream<T, K>
    where
        T: PartialEq,
    {
        self.dedupe_by(|a, b| Ok(a == b))
    }

    /// Drop values `equal` reports as equal to the previously dispatched
    /// one. A failing predicate aborts the dispatch with its error.
    ///
    /// The result is multicast (see [`remember`](Self::remember)): all
    /// subscribers share one comparison state and late subscribers receive
    /// the last dispatched value.
    pub fn dedupe_by<P>(&self, equal: P) -> Stream<T, K>
    where
        P: Fn(&T, &T) -> Result<bool> + 'static,
    {
        self.operator_with(DedupeState::new, move |state, value: T, out| {
            let last = state.borrow().last_value.clone();
            if let Some(last) = last {
                if equal(&last, &value)? {
                    tracing::trace!("dedupe: dropping repeated value");
                    return Ok(());
                }
            }
            // Record before dispatching so a value fed back in synchronously
            // compares against this one.
            state.borrow_mut().last_value = Some(value.clone());
            out.send(value)
        })
        .remember()
    }
}

#[cfg(test)]
mod tests {
    use crate::error::StreamError;
    use crate::observable::Subject;
    use crate::Stream;
    use serde_json::json;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[test]
    fn test_consecutive_repeats_dropped() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let _sub = Stream::of([1, 1, 2, 2, 2, 3])
            .dedupe()
            .subscribe_fn(move |v| sink.borrow_mut().push(v))
            .unwrap();

        assert_eq!(*seen.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn test_structural_equality_on_json() {
        let subject = Subject::<serde_json::Value>::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let _sub = subject
            .stream()
            .dedupe()
            .subscribe_fn(move |v| sink.borrow_mut().push(v))
            .unwrap();

        subject.next(json!({"x": 1, "y": [1, 2]})).unwrap();
        subject.next(json!({"y": [1, 2], "x": 1})).unwrap();
        subject.next(json!({"x": 2, "y": [1, 2]})).unwrap();

        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn test_custom_predicate() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let _sub = Stream::of([1.0, 1.05, 1.5, 1.52])
            .dedupe_by(|a: &f64, b: &f64| Ok((a - b).abs() < 0.1))
            .subscribe_fn(move |v| sink.borrow_mut().push(v))
            .unwrap();

        assert_eq!(*seen.borrow(), vec![1.0, 1.5]);
    }

    #[test]
    fn test_predicate_error_propagates() {
        let subject = Subject::<i32>::new();
        let _sub = subject
            .stream()
            .dedupe_by(|_: &i32, _: &i32| Err(StreamError::Predicate("nope".into())))
            .subscribe_fn(|_| {})
            .unwrap();

        // First value has nothing to compare against
        subject.next(1).unwrap();
        assert_eq!(
            subject.next(2),
            Err(StreamError::Predicate("nope".into()))
        );
    }

    #[test]
    fn test_subscribers_share_one_upstream() {
        let subject = Subject::<i32>::new();
        let deduped = subject.stream().dedupe();

        let count = Rc::new(Cell::new(0));
        let (c1, c2) = (count.clone(), count.clone());
        let _a = deduped.subscribe_fn(move |_: i32| c1.set(c1.get() + 1)).unwrap();
        let _b = deduped.subscribe_fn(move |_: i32| c2.set(c2.get() + 1)).unwrap();

        assert_eq!(subject.observer_count(), 1);
        subject.next(1).unwrap();
        subject.next(1).unwrap();
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_reentrant_feedback_terminates() {
        let subject = Subject::<i32>::new();
        let deduped = subject.stream().dedupe();

        let feedback = subject.clone();
        let calls = Rc::new(Cell::new(0));
        let c = calls.clone();
        let _sub = deduped
            .subscribe(Rc::new(move |v: i32| {
                c.set(c.get() + 1);
                // Echo the same value back into the source
                feedback.next(v)
            }))
            .unwrap();

        subject.next(9).unwrap();
        assert_eq!(calls.get(), 1);
    }
}
