//! Ordered observer registry shared by subjects and multicast groups.

use super::observer::{same_observer, ObserverRef};
use crate::types::ObserverId;

/// Observers in registration order.
pub(crate) struct ObserverSet<T> {
    entries: Vec<(ObserverId, ObserverRef<T>)>,
    next_id: ObserverId,
}

impl<T> ObserverSet<T> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: ObserverId(1),
        }
    }

    /// Register an observer. Returns `None` if this exact observer object is
    /// already registered.
    pub(crate) fn insert(&mut self, observer: ObserverRef<T>) -> Option<ObserverId> {
        if self.entries.iter().any(|(_, o)| same_observer(o, &observer)) {
            return None;
        }
        let id = self.next_id;
        self.next_id = id.next();
        self.entries.push((id, observer));
        Some(id)
    }

    pub(crate) fn remove(&mut self, id: ObserverId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    pub(crate) fn contains(&self, id: ObserverId) -> bool {
        self.entries.iter().any(|(entry, _)| *entry == id)
    }

    /// The earliest registration still present.
    pub(crate) fn first(&self) -> Option<ObserverId> {
        self.entries.first().map(|(id, _)| *id)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy of the current registrations, so dispatch can run without holding
    /// a borrow of the owning cell.
    pub(crate) fn snapshot(&self) -> Vec<(ObserverId, ObserverRef<T>)> {
        self.entries.clone()
    }
}
