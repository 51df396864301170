#![forbid(unsafe_code)]

//! Self-removing event listeners.
//!
//! # Invariants
//!
//! 1. The handler runs at most once.
//! 2. After the handler runs, or after [`OnceListener::cancel`], the host
//!    holds no registration for it, so repeated open/close cycles never
//!    accumulate listeners.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use hey_core::{Dom, Event, EventKind, EventTarget, Listener, ListenerId};

type Handler = Box<dyn FnOnce(&mut dyn Dom, &mut Event)>;

/// Registration returned by [`listen_once`].
#[derive(Debug, Clone)]
pub struct OnceListener {
    id: ListenerId,
    fired: Rc<Cell<bool>>,
}

impl OnceListener {
    #[inline]
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Whether the handler has already run.
    #[inline]
    pub fn has_fired(&self) -> bool {
        self.fired.get()
    }

    /// Remove the listener if it has not fired. Returns `true` if it was still registered.
    pub fn cancel(&self, dom: &mut dyn Dom) -> bool {
        dom.remove_event_listener(self.id)
    }
}

/// Listen for the first `kind` event on `target` accepted by `filter`.
///
/// Events rejected by `filter` leave the listener in place.
pub fn listen_once(
    dom: &mut dyn Dom,
    target: EventTarget,
    kind: EventKind,
    filter: impl Fn(&Event) -> bool + 'static,
    handler: impl FnOnce(&mut dyn Dom, &mut Event) + 'static,
) -> OnceListener {
    let slot: Rc<RefCell<Option<Handler>>> = Rc::new(RefCell::new(Some(Box::new(handler))));
    let own_id: Rc<Cell<Option<ListenerId>>> = Rc::new(Cell::new(None));
    let fired = Rc::new(Cell::new(false));

    let listener: Listener = {
        let own_id = Rc::clone(&own_id);
        let fired = Rc::clone(&fired);
        Rc::new(move |dom: &mut dyn Dom, event: &mut Event| {
            if !filter(event) {
                return;
            }
            if let Some(id) = own_id.get() {
                dom.remove_event_listener(id);
            }
            let handler = slot.borrow_mut().take();
            if let Some(handler) = handler {
                fired.set(true);
                handler(dom, event);
            }
        })
    };
    let id = dom.add_event_listener(target, kind, listener);
    own_id.set(Some(id));
    OnceListener { id, fired }
}
