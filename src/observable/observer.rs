//! The value-receiving side of a subscription.

use crate::error::Result;
use std::rc::Rc;

/// A consumer with a single `next` channel.
///
/// There is no completion or error channel: a failing `next` returns the
/// error to whoever dispatched the value.
pub trait Observer<T> {
    fn next(&self, value: T) -> Result<()>;
}

impl<T, F> Observer<T> for F
where
    F: Fn(T) -> Result<()>,
{
    fn next(&self, value: T) -> Result<()> {
        self(value)
    }
}

/// Shared handle to an observer. Identity is the allocation it points to.
pub type ObserverRef<T> = Rc<dyn Observer<T>>;

/// Wrap a closure as a shared observer.
pub fn observer<T, F>(f: F) -> ObserverRef<T>
where
    T: 'static,
    F: Fn(T) -> Result<()> + 'static,
{
    Rc::new(f)
}

/// Whether two handles point at the same observer object.
pub(crate) fn same_observer<T: ?Sized>(a: &Rc<T>, b: &Rc<T>) -> bool {
    // Compare data pointers only; vtable pointers of the same type may differ
    // between codegen units.
    std::ptr::eq(Rc::as_ptr(a) as *const (), Rc::as_ptr(b) as *const ())
}
