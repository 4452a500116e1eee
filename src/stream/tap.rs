//! Side-effecting taps and synchronous reads.

use super::{Stream, StreamKind};
use crate::error::Result;
use crate::observable::observer;
use crate::path::PropertyPath;
use crate::sink::LogSink;
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;

impl<T: 'static, K: StreamKind> Stream<T, K> {
    /// Write `(label, value)` to `sink` for every value, then forward the
    /// value unchanged.
    pub fn log<S>(&self, label: impl Into<String>, sink: S) -> Stream<T, K>
    where
        S: LogSink<T> + 'static,
    {
        let label = label.into();
        self.operator(move |value, out| {
            sink.write(&label, &value);
            out.send(value)
        })
    }

    /// Subscribe, take the first value dispatched during the subscribe call,
    /// and unsubscribe.
    ///
    /// Returns `Ok(None)` when nothing was dispatched synchronously, which is
    /// the usual result on a cold stream. Only streams that replay on
    /// subscribe (`remember`, `dedupe`, synchronous producers) give a
    /// meaningful snapshot.
    pub fn read(&self) -> Result<Option<T>> {
        let slot = Rc::new(RefCell::new(None));
        let writer = slot.clone();
        let subscription = self.subscribe(observer(move |value: T| {
            let mut slot = writer.borrow_mut();
            if slot.is_none() {
                *slot = Some(value);
            }
            Ok(())
        }))?;
        subscription.unsubscribe();

        let value = slot.borrow_mut().take();
        Ok(value)
    }
}

impl<K: StreamKind> Stream<Value, K> {
    /// Like [`log`](Self::log), but writes the value found at `path`. The
    /// forwarded value is still the original one.
    pub fn log_path<S>(&self, label: impl Into<String>, path: &str, sink: S) -> Stream<Value, K>
    where
        S: LogSink<Value> + 'static,
    {
        let label = label.into();
        let path = PropertyPath::parse(path);
        self.operator(move |value, out| {
            let shown = path.resolve(&value)?;
            sink.write(&label, &shown);
            out.send(value)
        })
    }
}
