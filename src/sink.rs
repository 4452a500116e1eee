//! Logging sinks for the `log` operator.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Destination for `(label, value)` pairs written by `log`.
pub trait LogSink<T> {
    fn write(&self, label: &str, value: &T);
}

impl<T, S: LogSink<T> + ?Sized> LogSink<T> for Rc<S> {
    fn write(&self, label: &str, value: &T) {
        (**self).write(label, value)
    }
}

/// Writes every pair as a `tracing` info event.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl<T: fmt::Debug> LogSink<T> for TracingSink {
    fn write(&self, label: &str, value: &T) {
        tracing::info!(target: "motion_stream::log", label, value = ?value);
    }
}

/// Keeps every pair in memory, in write order.
pub struct MemorySink<T> {
    entries: RefCell<Vec<(String, T)>>,
}

impl<T> Default for MemorySink<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MemorySink<T> {
    pub fn new() -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn take(&self) -> Vec<(String, T)> {
        std::mem::take(&mut *self.entries.borrow_mut())
    }
}

impl<T: Clone> MemorySink<T> {
    pub fn entries(&self) -> Vec<(String, T)> {
        self.entries.borrow().clone()
    }
}

impl<T: Clone> LogSink<T> for MemorySink<T> {
    fn write(&self, label: &str, value: &T) {
        self.entries
            .borrow_mut()
            .push((label.to_string(), value.clone()));
    }
}
