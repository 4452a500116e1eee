//! Fan-in of several sources into one stream.

use super::{Stream, StreamKind};
use crate::observable::{Observable, Subscription};
use std::rc::Rc;

impl<T: 'static, K: StreamKind> Stream<T, K> {
    /// Forward values from this stream and every stream in `others`, in
    /// arrival order.
    ///
    /// All sources are subscribed with the same observer. Unsubscribing
    /// releases every source in order. If a later source fails to
    /// subscribe, the sources already opened are released before the
    /// error is returned.
    pub fn merge<O, I>(&self, others: I) -> Stream<T, K>
    where
        O: Observable<T> + 'static,
        I: IntoIterator<Item = O>,
    {
        let parent = self.producer.clone();
        let sources: Rc<[O]> = others.into_iter().collect();
        self.derive(move |observer| {
            let mut subscriptions = Vec::with_capacity(sources.len() + 1);
            subscriptions.push(parent(observer.clone())?);
            for source in sources.iter() {
                match source.subscribe(observer.clone()) {
                    Ok(subscription) => subscriptions.push(subscription),
                    Err(e) => {
                        Subscription::merge(subscriptions).unsubscribe();
                        return Err(e);
                    }
                }
            }
            Ok(Subscription::merge(subscriptions))
        })
    }
}
