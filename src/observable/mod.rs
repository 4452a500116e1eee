//! The observable primitive the stream engine is built on.
//!
//! An [`Observable`] is a producer contract: given an [`Observer`], it starts
//! an execution and returns a [`Subscription`] that tears it down. Every
//! subscribe call starts an independent execution unless the producer is
//! itself shared (a [`Subject`], or a stream wrapped by `remember()`).
//!
//! # Example
//!
//! ```ignore
//! let pointer_x = Subject::new();
//!
//! let sub = pointer_x.subscribe(observer(|x: f64| {
//!     println!("x = {x}");
//!     Ok(())
//! }))?;
//!
//! pointer_x.next(12.0)?;
//! sub.unsubscribe();
//! ```

mod observer;
pub(crate) mod registry;
mod subject;
mod subscription;

pub use observer::{observer, Observer, ObserverRef};
pub use subject::Subject;
pub use subscription::Subscription;

use crate::error::Result;

/// Anything that can be subscribed to.
pub trait Observable<T> {
    fn subscribe(&self, observer: ObserverRef<T>) -> Result<Subscription>;
}
