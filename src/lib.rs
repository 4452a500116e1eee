//! # Motion Stream
//!
//! A push-based, single-channel observable stream engine with a fixed
//! vocabulary of declarative operators, for turning raw input events
//! (pointer, time, gesture) into render-ready values.
//!
//! ## Core Concepts
//!
//! - **Streams**: immutable descriptions of a value source; every operator
//!   returns a new stream and nothing runs until something subscribes
//! - **Subjects**: hot root sources that inputs are pushed into
//! - **Multicast**: `remember` and `dedupe` share one upstream execution and
//!   replay the last value to late subscribers
//! - **Scheduling**: `debounce` coalesces bursts to one value per tick of an
//!   injected [`Scheduler`]
//! - **Stream kinds**: a kind value travels through every operator, so
//!   specialised streams stay specialised
//!
//! ## Example
//!
//! ```ignore
//! use motion_stream::{MapRange, Subject, TracingSink};
//! use serde_json::{json, Value};
//!
//! let pointer: Subject<Value> = Subject::new();
//!
//! let progress = pointer
//!     .stream()
//!     .log("pointer", TracingSink)
//!     .pluck("clientX")
//!     .map(|x| x.as_f64().unwrap_or(0.0))
//!     .map_range(MapRange::new(0.0, 400.0))
//!     .dedupe();
//!
//! let sub = progress.subscribe_fn(|p| println!("progress {p:.2}"))?;
//! pointer.next(json!({"clientX": 100}))?;
//! assert_eq!(progress.read()?, Some(0.25));
//! sub.unsubscribe();
//! ```

pub mod error;
pub mod observable;
pub mod path;
pub mod scheduler;
pub mod sink;
pub mod stream;
pub mod types;

// Re-exports
pub use error::{Result, StreamError};
pub use observable::{observer, Observable, Observer, ObserverRef, Subject, Subscription};
pub use path::PropertyPath;
pub use scheduler::{ManualClock, Scheduler, TickCallback, TickToken};
pub use sink::{LogSink, MemorySink, TracingSink};
pub use stream::{Dispatch, Invertible, Plain, Producer, Stream, StreamKind};
pub use types::*;
