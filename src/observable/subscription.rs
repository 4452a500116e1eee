//! Teardown handles.

use std::fmt;

type Teardown = Box<dyn FnOnce()>;

/// Handle returned by every subscribe call.
///
/// `unsubscribe` consumes the handle and releases everything the subscribe
/// call created. Dropping the handle without unsubscribing leaves the
/// subscription live.
#[must_use = "dropping a Subscription does not unsubscribe; call `unsubscribe`"]
pub struct Subscription {
    teardown: Option<Teardown>,
}

impl Subscription {
    /// Create a subscription that runs `teardown` once on unsubscribe.
    pub fn new(teardown: impl FnOnce() + 'static) -> Self {
        Self {
            teardown: Some(Box::new(teardown)),
        }
    }

    /// A subscription with nothing to release.
    pub fn empty() -> Self {
        Self { teardown: None }
    }

    /// Combine several subscriptions; they are released in order.
    pub fn merge(subscriptions: Vec<Subscription>) -> Self {
        Self::new(move || {
            for subscription in subscriptions {
                subscription.unsubscribe();
            }
        })
    }

    pub fn is_empty(&self) -> bool {
        self.teardown.is_none()
    }

    pub fn unsubscribe(mut self) {
        if let Some(teardown) = self.teardown.take() {
            teardown();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("empty", &self.is_empty())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_teardown_runs_once() {
        let count = Rc::new(RefCell::new(0));
        let c = count.clone();
        let sub = Subscription::new(move || *c.borrow_mut() += 1);
        assert!(!sub.is_empty());

        sub.unsubscribe();
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_merge_releases_in_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let subs = (0..3)
            .map(|i| {
                let order = order.clone();
                Subscription::new(move || order.borrow_mut().push(i))
            })
            .collect();

        Subscription::merge(subs).unsubscribe();
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn test_drop_does_not_tear_down() {
        let count = Rc::new(RefCell::new(0));
        let c = count.clone();
        drop(Subscription::new(move || *c.borrow_mut() += 1));
        assert_eq!(*count.borrow(), 0);
    }
}
