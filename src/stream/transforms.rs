//! Stateless per-value operators.

use super::{Stream, StreamKind};
use crate::error::Result;
use crate::path::PropertyPath;
use crate::types::{MapRange, Toggle};
use serde_json::Value;

/// Values `inverted` knows how to flip.
///
/// `invert` returns `None` for values outside the toggle domain; `inverted`
/// drops those instead of passing them through.
pub trait Invertible: Sized {
    fn invert(&self) -> Option<Self>;
}

impl Invertible for Value {
    fn invert(&self) -> Option<Self> {
        Toggle::from_value(self).map(|t| t.inverse().to_value())
    }
}

impl Invertible for bool {
    fn invert(&self) -> Option<Self> {
        Some(!*self)
    }
}

impl<T: 'static, K: StreamKind> Stream<T, K> {
    /// Dispatch `f(value)` for every value.
    pub fn map<U, F>(&self, f: F) -> Stream<U, K>
    where
        U: 'static,
        F: Fn(T) -> U + 'static,
    {
        self.operator(move |value, out| out.send(f(value)))
    }

    /// Like `map`, but `f` may fail; the error aborts the dispatch.
    pub fn try_map<U, F>(&self, f: F) -> Stream<U, K>
    where
        U: 'static,
        F: Fn(T) -> Result<U> + 'static,
    {
        self.operator(move |value, out| out.send(f(value)?))
    }

    /// Dispatch only the values `predicate` accepts.
    pub fn filter<F>(&self, predicate: F) -> Stream<T, K>
    where
        F: Fn(&T) -> bool + 'static,
    {
        self.operator(move |value, out| {
            if predicate(&value) {
                out.send(value)
            } else {
                Ok(())
            }
        })
    }

    /// Dispatch `constant` whenever the upstream emits.
    pub fn map_to<U>(&self, constant: U) -> Stream<U, K>
    where
        U: Clone + 'static,
    {
        self.operator(move |_, out| out.send(constant.clone()))
    }

    /// Flip toggles (`0`/`1`, `false`/`true`); drop everything else.
    pub fn inverted(&self) -> Stream<T, K>
    where
        T: Invertible,
    {
        self.operator(|value: T, out| match value.invert() {
            Some(flipped) => out.send(flipped),
            None => {
                tracing::trace!("inverted: dropping value outside the toggle domain");
                Ok(())
            }
        })
    }
}

impl<K: StreamKind> Stream<f64, K> {
    /// Linearly map values from `range`'s domain onto its output range.
    pub fn map_range(&self, range: MapRange) -> Stream<f64, K> {
        self.map(move |value| range.apply(value))
    }
}

impl<K: StreamKind> Stream<Value, K> {
    /// Extract the value at a dot-delimited path.
    ///
    /// Fails with [`StreamError::PathResolution`](crate::StreamError) when an
    /// intermediate segment resolves to `null`.
    pub fn pluck(&self, path: &str) -> Stream<Value, K> {
        let path = PropertyPath::parse(path);
        self.operator(move |value, out| out.send(path.resolve(&value)?))
    }
}
