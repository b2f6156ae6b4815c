//! Change notification.
//!
//! Observers are zero-argument closures invoked synchronously, in
//! registration order, after every recomputation of the derived snapshot.

use std::fmt;

/// Handle returned by [`ChangeNotifier::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

type Observer = Box<dyn FnMut()>;

/// Ordered list of observers.
#[derive(Default)]
pub struct ChangeNotifier {
    next_id: u64,
    observers: Vec<(ObserverId, Observer)>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `observer`; it runs after every observer registered before it.
    pub fn subscribe<F>(&mut self, observer: F) -> ObserverId
    where
        F: FnMut() + 'static,
    {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove the observer registered under `id`.
    ///
    /// Returns `false` (and does nothing) if `id` is not registered.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        match self.observers.iter().position(|(oid, _)| *oid == id) {
            Some(index) => {
                self.observers.remove(index);
                true
            }
            None => false,
        }
    }

    /// Invoke every observer once, in registration order.
    pub fn notify(&mut self) {
        for (_, observer) in self.observers.iter_mut() {
            observer();
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("observers", &self.observers.len())
            .finish()
    }
}
