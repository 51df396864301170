#![forbid(unsafe_code)]

//! Trailing-edge debounce.
//!
//! Each [`Debounce::call`] (re)arms a single timer; the action runs once,
//! `delay` after the last call. There is at most one pending timer per
//! `Debounce`, so bursts of resize events cost one recomputation.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use hey_core::{Dom, TimerId};

/// A debounced action. Cloning shares the pending timer.
#[derive(Clone)]
pub struct Debounce {
    delay: Duration,
    action: Rc<dyn Fn(&mut dyn Dom)>,
    pending: Rc<Cell<Option<TimerId>>>,
}

impl fmt::Debug for Debounce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Debounce")
            .field("delay", &self.delay)
            .field("pending", &self.pending.get())
            .finish()
    }
}

impl Debounce {
    pub fn new(delay: Duration, action: impl Fn(&mut dyn Dom) + 'static) -> Self {
        Self {
            delay,
            action: Rc::new(action),
            pending: Rc::new(Cell::new(None)),
        }
    }

    #[inline]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule the action, cancelling any call still waiting.
    pub fn call(&self, dom: &mut dyn Dom) {
        if let Some(timer) = self.pending.take() {
            dom.clear_timeout(timer);
        }
        let pending = Rc::clone(&self.pending);
        let action = Rc::clone(&self.action);
        let timer = dom.set_timeout(
            self.delay,
            Box::new(move |dom: &mut dyn Dom| {
                pending.set(None);
                action(dom);
            }),
        );
        self.pending.set(Some(timer));
    }

    /// Drop a pending call without running it.
    pub fn cancel(&self, dom: &mut dyn Dom) {
        if let Some(timer) = self.pending.take() {
            dom.clear_timeout(timer);
        }
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending.get().is_some()
    }
}
