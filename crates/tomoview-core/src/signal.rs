//! Single-threaded observer plumbing.
//!
//! A [`Signal`] owns a list of handlers. [`Signal::connect`] hands back a
//! [`Subscription`]; dropping it removes the handler, so whoever holds the
//! subscription decides how long the connection lives.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

type Handler<T> = Rc<dyn Fn(&T)>;
type HandlerList<T> = RefCell<Vec<(u64, Handler<T>)>>;

pub struct Signal<T> {
    handlers: Rc<HandlerList<T>>,
    next_id: Cell<u64>,
}

impl<T: 'static> Signal<T> {
    pub fn new() -> Self {
        Self {
            handlers: Rc::new(RefCell::new(Vec::new())),
            next_id: Cell::new(0),
        }
    }

    /// Register `handler`. It stays connected until the returned
    /// subscription is dropped.
    #[must_use = "dropping the subscription disconnects the handler"]
    pub fn connect(&self, handler: impl Fn(&T) + 'static) -> Subscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.handlers.borrow_mut().push((id, Rc::new(handler)));

        let list: Weak<HandlerList<T>> = Rc::downgrade(&self.handlers);
        Subscription {
            disconnect: Some(Box::new(move || {
                if let Some(list) = list.upgrade() {
                    list.borrow_mut().retain(|(item, _)| *item != id);
                }
            })),
        }
    }

    /// Call every connected handler in connection order.
    ///
    /// The handler list is snapshotted first, so handlers may connect or
    /// disconnect (including themselves) while the signal is being emitted.
    pub fn emit(&self, value: &T) {
        let handlers: Vec<Handler<T>> = self
            .handlers
            .borrow()
            .iter()
            .map(|(_, h)| Rc::clone(h))
            .collect();
        for handler in handlers {
            handler(value);
        }
    }

    pub fn connection_count(&self) -> usize {
        self.handlers.borrow().len()
    }
}

impl<T: 'static> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Connection handle returned by [`Signal::connect`].
pub struct Subscription {
    disconnect: Option<Box<dyn FnOnce()>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(disconnect) = self.disconnect.take() {
            disconnect();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drop_disconnects() {
        let signal = Signal::<i32>::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let sub = signal.connect(move |v| h.set(h.get() + *v));
        signal.emit(&2);
        drop(sub);
        signal.emit(&5);
        assert_eq!(hits.get(), 2);
        assert_eq!(signal.connection_count(), 0);
    }

    #[test]
    fn subscription_outliving_signal_is_harmless() {
        let signal = Signal::<()>::new();
        let sub = signal.connect(|_| {});
        drop(signal);
        drop(sub);
    }
}
