use std::{cell::RefCell, collections::HashMap, hash::Hash, rc::Rc};

use crate::error::ListenerError;

pub type ListenerResult = Result<(), ListenerError>;

type Listener<V> = Rc<dyn Fn(&V) -> ListenerResult>;

/// Handle returned by [`Router::add_listener`], used to remove it again
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

// ListenerRegistry

struct ListenerRegistry<K, V> {
    next_id: u64,
    listeners: HashMap<K, Vec<(ListenerId, Listener<V>)>>,
}

impl<K: Eq + Hash, V> ListenerRegistry<K, V> {
    fn new() -> Self {
        Self {
            next_id: 0,
            listeners: HashMap::new(),
        }
    }

    fn add(&mut self, key: K, listener: Listener<V>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.listeners.entry(key).or_default().push((id, listener));
        id
    }

    fn remove(&mut self, key: &K, id: ListenerId) -> bool {
        let Some(entries) = self.listeners.get_mut(key) else {
            return false;
        };
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        let removed = entries.len() != before;
        if entries.is_empty() {
            self.listeners.remove(key);
        }
        removed
    }

    fn contains(&self, key: &K, id: ListenerId) -> bool {
        self.listeners
            .get(key)
            .is_some_and(|entries| entries.iter().any(|(entry_id, _)| *entry_id == id))
    }

    fn len(&self, key: &K) -> usize {
        self.listeners.get(key).map_or(0, Vec::len)
    }

    fn snapshot(&self, key: &K) -> Vec<(ListenerId, Listener<V>)> {
        self.listeners.get(key).cloned().unwrap_or_default()
    }
}

// Router

/// Listener table for one command kind, keyed by exact discriminator
///
/// Listeners run in registration order. A listener removed while a
/// notification is in flight is not called for it; a listener added while
/// one is in flight first sees the next notification.
pub struct Router<K, V> {
    registry: RefCell<ListenerRegistry<K, V>>,
}

impl<K: Eq + Hash, V> Default for Router<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash, V> Router<K, V> {
    pub fn new() -> Self {
        Self {
            registry: RefCell::new(ListenerRegistry::new()),
        }
    }

    pub fn add_listener<F>(&self, key: K, listener: F) -> ListenerId
    where
        F: Fn(&V) -> ListenerResult + 'static,
    {
        self.registry.borrow_mut().add(key, Rc::new(listener))
    }

    /// Returns whether the listener was still registered
    pub fn remove_listener(&self, key: &K, id: ListenerId) -> bool {
        self.registry.borrow_mut().remove(key, id)
    }

    pub fn contains_listener(&self, key: &K, id: ListenerId) -> bool {
        self.registry.borrow().contains(key, id)
    }

    pub fn listener_count(&self, key: &K) -> usize {
        self.registry.borrow().len(key)
    }

    /// Calls every listener registered under `key`, returning how many ran
    ///
    /// No key match is the common case and not an error. A failing listener
    /// is handed to `on_error` and the rest still run.
    pub fn notify(
        &self,
        key: &K,
        value: &V,
        on_error: &mut dyn FnMut(ListenerError),
    ) -> usize {
        let snapshot = self.registry.borrow().snapshot(key);
        let mut notified = 0;
        for (id, listener) in snapshot {
            if !self.contains_listener(key, id) {
                continue;
            }
            notified += 1;
            if let Err(error) = listener(value) {
                on_error(error);
            }
        }
        notified
    }
}
