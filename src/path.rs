//! Dot-path extraction over JSON values, shared by `pluck` and `log_path`.

use crate::error::{Result, StreamError};
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;

static NULL: Value = Value::Null;

/// A parsed dot-delimited path such as `touches.0.clientX`.
///
/// Each segment is a property lookup. On an array a segment is read as an
/// index, except `length`, which yields the element count; any other
/// non-numeric segment on an array yields `null`. Looking up a missing key,
/// or any key on a string, number or bool, yields `null`; only a `null`
/// parent with segments still pending is an error.
#[derive(Clone, PartialEq, Eq)]
pub struct PropertyPath {
    raw: String,
    segments: Vec<String>,
}

impl PropertyPath {
    pub fn parse(path: &str) -> Self {
        Self {
            raw: path.to_string(),
            segments: path.split('.').map(str::to_string).collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Walk the path from `value`, returning the final resolved value.
    pub fn resolve(&self, value: &Value) -> Result<Value> {
        let mut current = Cow::Borrowed(value);
        for segment in &self.segments {
            current = match current {
                Cow::Borrowed(v) => self.step(v, segment)?,
                Cow::Owned(v) => Cow::Owned(self.step(&v, segment)?.into_owned()),
            };
        }
        Ok(current.into_owned())
    }

    fn step<'a>(&self, current: &'a Value, segment: &str) -> Result<Cow<'a, Value>> {
        let next = match current {
            Value::Null => {
                return Err(StreamError::PathResolution {
                    path: self.raw.clone(),
                    segment: segment.to_string(),
                    found: "null",
                })
            }
            Value::Object(map) => map.get(segment).unwrap_or(&NULL),
            Value::Array(items) if segment == "length" => {
                return Ok(Cow::Owned(Value::from(items.len())))
            }
            Value::Array(items) => segment
                .parse::<usize>()
                .ok()
                .and_then(|i| items.get(i))
                .unwrap_or(&NULL),
            _ => &NULL,
        };
        Ok(Cow::Borrowed(next))
    }
}

impl From<&str> for PropertyPath {
    fn from(path: &str) -> Self {
        PropertyPath::parse(path)
    }
}

impl fmt::Debug for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PropertyPath({:?})", self.raw)
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
