//! Core value types shared by the operators.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Registration id of an observer inside a multicast group or subject.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObserverId(pub u64);

impl fmt::Debug for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObserverId({})", self.0)
    }
}

impl fmt::Display for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ObserverId {
    pub fn next(self) -> Self {
        ObserverId(self.0 + 1)
    }
}

/// The four values `inverted` recognizes.
///
/// Numeric and boolean toggles are kept apart: `0` inverts to `1`, never to
/// `true`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Toggle {
    Zero,
    One,
    False,
    True,
}

impl Toggle {
    /// Classify a JSON value. Anything outside the four toggles is `None`.
    ///
    /// Numbers match by numeric value, so `1.0` counts as `One`.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(false) => Some(Toggle::False),
            Value::Bool(true) => Some(Toggle::True),
            Value::Number(n) => match n.as_f64() {
                Some(x) if x == 0.0 => Some(Toggle::Zero),
                Some(x) if x == 1.0 => Some(Toggle::One),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn inverse(self) -> Self {
        match self {
            Toggle::Zero => Toggle::One,
            Toggle::One => Toggle::Zero,
            Toggle::False => Toggle::True,
            Toggle::True => Toggle::False,
        }
    }

    pub fn to_value(self) -> Value {
        match self {
            Toggle::Zero => Value::from(0),
            Toggle::One => Value::from(1),
            Toggle::False => Value::Bool(false),
            Toggle::True => Value::Bool(true),
        }
    }
}

/// Linear mapping from a domain onto a range, used by `map_range`.
///
/// The output range defaults to `0..1`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MapRange {
    pub from_start: f64,
    pub from_end: f64,
    pub to_start: f64,
    pub to_end: f64,
}

impl Default for MapRange {
    fn default() -> Self {
        Self {
            from_start: 0.0,
            from_end: 1.0,
            to_start: 0.0,
            to_end: 1.0,
        }
    }
}

impl MapRange {
    /// Map `from_start..from_end` onto the default `0..1` range.
    pub fn new(from_start: f64, from_end: f64) -> Self {
        Self {
            from_start,
            from_end,
            ..Default::default()
        }
    }

    /// Replace the output range.
    pub fn to(self, to_start: f64, to_end: f64) -> Self {
        Self {
            to_start,
            to_end,
            ..self
        }
    }

    /// Load a mapping from a JSON document such as
    /// `{"fromStart": 0, "fromEnd": 200, "toStart": 1, "toEnd": 0}`.
    pub fn from_json(doc: &str) -> Result<Self> {
        Ok(serde_json::from_str(doc)?)
    }

    /// Interpolate one value.
    ///
    /// A zero-width domain divides by zero and yields NaN or an infinity.
    pub fn apply(&self, value: f64) -> f64 {
        let progress = (value - self.from_end) / (self.from_start - self.from_end);
        self.to_end + progress * (self.to_start - self.to_end)
    }
}
