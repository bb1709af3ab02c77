use std::cell::RefCell;
use std::rc::Rc;

use gloo::timers::callback::Timeout;

/// Trailing-edge debounce: each `trigger` restarts the quiet window, and the
/// callback runs once after the last trigger of a burst.
pub struct Debouncer {
    delay_ms: u32,
    callback: Rc<dyn Fn()>,
    pending: RefCell<Option<Timeout>>,
}

impl Debouncer {
    pub fn new(delay_ms: u32, callback: impl Fn() + 'static) -> Self {
        Debouncer {
            delay_ms,
            callback: Rc::new(callback),
            pending: RefCell::new(None),
        }
    }

    pub fn trigger(&self) {
        let callback = self.callback.clone();
        // Replacing the timeout drops, and so cancels, the previous one.
        *self.pending.borrow_mut() = Some(Timeout::new(self.delay_ms, move || callback()));
    }

    /// Drop a pending run without firing it.
    pub fn cancel(&self) {
        *self.pending.borrow_mut() = None;
    }
}

impl std::fmt::Debug for Debouncer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("delay_ms", &self.delay_ms)
            .field("pending", &self.pending.borrow().is_some())
            .finish()
    }
}
