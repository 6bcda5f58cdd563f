use std::{
    cell::{Ref, RefCell},
    hash::Hash,
    rc::{Rc, Weak},
};

use crate::{
    dispatcher::Dispatcher,
    error::ListenerError,
    router::{ListenerId, ListenerResult, Router},
};

// Subscription

/// Removes one listener from its router when released or dropped
struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    fn new<K, V>(router: &Rc<Router<K, V>>, key: K, id: ListenerId) -> Self
    where
        K: Eq + Hash + 'static,
        V: 'static,
    {
        let router: Weak<Router<K, V>> = Rc::downgrade(router);
        Self {
            release: Some(Box::new(move || {
                if let Some(router) = router.upgrade() {
                    router.remove_listener(&key, id);
                }
            })),
        }
    }

    fn release(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }

    fn is_active(&self) -> bool {
        self.release.is_some()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

// Collector

/// Per-update stream of the items one router subscription matched
///
/// The stream is cleared by the client's before-update hook and refilled
/// while inbound records are drained, so after `update()` returns it holds
/// exactly this update's arrivals in arrival order. Reading it before the
/// first update, or holding a [`stream`](Self::stream) borrow across an
/// update, yields stale data rather than an error.
///
/// Disposing (explicitly or by dropping) removes both listeners; it is
/// safe to do at any time, including from inside another listener.
pub struct Collector<I> {
    stream: Rc<RefCell<Vec<I>>>,
    clear: Subscription,
    income: Subscription,
}

impl<I: 'static> Collector<I> {
    /// Subscribes to `key` on `router`. `map` turns a notification into a
    /// stream item, or `None` to skip it.
    pub(crate) fn new<K, V, F>(dispatcher: &Dispatcher, router: &Rc<Router<K, V>>, key: K, map: F) -> Self
    where
        K: Clone + Eq + Hash + 'static,
        V: 'static,
        F: Fn(&V) -> Result<Option<I>, ListenerError> + 'static,
    {
        let stream: Rc<RefCell<Vec<I>>> = Rc::new(RefCell::new(Vec::new()));

        let before_update = dispatcher.before_update();
        let clear_stream = stream.clone();
        let clear_id = before_update.add_listener((), move |_| -> ListenerResult {
            clear_stream
                .try_borrow_mut()
                .map_err(|_| ListenerError::StreamBorrowed)?
                .clear();
            Ok(())
        });

        let push_stream = stream.clone();
        let income_id = router.add_listener(key.clone(), move |notification| {
            if let Some(item) = map(notification)? {
                push_stream
                    .try_borrow_mut()
                    .map_err(|_| ListenerError::StreamBorrowed)?
                    .push(item);
            }
            Ok(())
        });

        Self {
            stream,
            clear: Subscription::new(before_update, (), clear_id),
            income: Subscription::new(router, key, income_id),
        }
    }

    /// Items matched during the latest update
    pub fn stream(&self) -> Ref<'_, [I]> {
        Ref::map(self.stream.borrow(), Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.stream.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.stream.borrow().is_empty()
    }

    /// Stops observing. Idempotent; the last stream contents stay readable.
    pub fn dispose(&mut self) {
        self.clear.release();
        self.income.release();
    }

    pub fn is_disposed(&self) -> bool {
        !self.income.is_active()
    }
}
