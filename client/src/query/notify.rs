//! Change listeners for the cache and mutations.
//!
//! Listeners run after the cache has released its borrow, so a listener may
//! read the cache. The Leptos layer uses one to bump a revision signal.

use std::cell::RefCell;
use std::rc::Rc;

type Listener = Rc<dyn Fn()>;

#[derive(Clone, Default)]
pub struct Notifier {
    listeners: Rc<RefCell<Vec<Listener>>>,
}

impl Notifier {
    pub fn subscribe(&self, listener: impl Fn() + 'static) {
        self.listeners.borrow_mut().push(Rc::new(listener));
    }

    pub fn notify(&self) {
        let listeners = self.listeners.borrow().clone();
        for listener in listeners {
            listener();
        }
    }
}
