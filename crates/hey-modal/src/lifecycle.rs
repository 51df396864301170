#![forbid(unsafe_code)]

//! Open/close state machine, focus trap and page scroll lock.
//!
//! ```text
//!            open()                focus established
//!  Closed ──────────▶ Opening ─────────────────────▶ Open
//!    ▲                   │ close()                     │ close()
//!    │                   ▼                             ▼
//!    └──────────────── Closing ◀───────────────────────┘
//!     transition ended (or immediately without transitions)
//! ```
//!
//! Work that must wait for the wrapper's CSS transition goes through a
//! [`TransitionGate`]; at most one wait is pending per modal, and it is
//! cancelled when a close interrupts an opening.
//!
//! # Invariants
//!
//! 1. `open` only acts from `Closed`; `close` only from `Opening` or `Open`.
//!    Other calls are ignored with a warning.
//! 2. Focus returns to the element focused before `open` as soon as
//!    `close` is called, not after the transition. When there is no such
//!    element, focus moves to the body; it never stays inside a closing
//!    dialog.
//! 3. No `RefCell` borrow is held while events are dispatched or
//!    continuations run, so listeners may call back into the modal.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Stuck in `Opening`/`Closing` | Host never fires `transitionend` on the wrapper | Stays pending; no timeout |
//! | No focusable descendants | Custom markup removed the close button | Trap is empty, focus untouched |

use std::cell::RefCell;
use std::rc::Rc;

use hey_core::{Dom, Event, EventKind, EventTarget, FOCUSABLE_SELECTOR, KeyCode, NodeId};
use hey_runtime::{TransitionGate, TransitionWait};

use crate::builder::ModalNodes;
use crate::config::{ClassConfig, ClassRole};
use crate::environment::{Environment, EnvironmentCapabilities};
use crate::factory::ModalId;

/// Dispatched on the wrapper when the modal starts opening.
pub const OPENED_EVENT: &str = "heyOpen";
/// Dispatched on the wrapper when the modal has finished closing.
pub const CLOSED_EVENT: &str = "heyClose";

/// Visibility state of a modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    #[default]
    Closed,
    Opening,
    Open,
    Closing,
}

/// Focus containment bookkeeping, recomputed on every open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FocusTrap {
    pub first: Option<NodeId>,
    pub last: Option<NodeId>,
    /// Element to restore focus to on close.
    pub last_focused: Option<NodeId>,
}

struct ModalInner {
    id: ModalId,
    nodes: ModalNodes,
    visible_classes: Vec<String>,
    scroll_lock_classes: Vec<String>,
    gate: TransitionGate,
    env: Rc<Environment>,
    state: Visibility,
    trap: FocusTrap,
    pending: Option<TransitionWait>,
}

/// Runtime controller of one modal. Cloning shares the state.
#[derive(Clone)]
pub struct Lifecycle {
    inner: Rc<RefCell<ModalInner>>,
}

impl std::fmt::Debug for Lifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Lifecycle")
            .field("id", &inner.id)
            .field("state", &inner.state)
            .field("trap", &inner.trap)
            .finish()
    }
}

impl Lifecycle {
    pub fn new(
        id: ModalId,
        nodes: ModalNodes,
        classes: &ClassConfig,
        env: Rc<Environment>,
        capabilities: EnvironmentCapabilities,
    ) -> Self {
        let inner = ModalInner {
            id,
            nodes,
            visible_classes: classes.get(ClassRole::VisibleState).to_vec(),
            scroll_lock_classes: classes.get(ClassRole::ScrollLockState).to_vec(),
            gate: TransitionGate::new(nodes.wrapper, capabilities.supports_transitions),
            env,
            state: Visibility::Closed,
            trap: FocusTrap::default(),
            pending: None,
        };
        Self {
            inner: Rc::new(RefCell::new(inner)),
        }
    }

    #[inline]
    pub fn state(&self) -> Visibility {
        self.inner.borrow().state
    }

    #[inline]
    pub fn focus_trap(&self) -> FocusTrap {
        self.inner.borrow().trap
    }

    /// Show the modal.
    pub fn open(&self, dom: &mut dyn Dom) {
        let (id, nodes, visible, lock, gate, env) = {
            let mut inner = self.inner.borrow_mut();
            if inner.state != Visibility::Closed {
                tracing::warn!(modal_id = %inner.id, state = ?inner.state, "open ignored");
                return;
            }
            inner.state = Visibility::Opening;
            inner.trap.last_focused = dom.active_element();
            (
                inner.id,
                inner.nodes,
                inner.visible_classes.clone(),
                inner.scroll_lock_classes.clone(),
                inner.gate,
                Rc::clone(&inner.env),
            )
        };
        tracing::debug!(modal_id = %id, "opening");

        for class in &visible {
            dom.add_class(nodes.wrapper, class);
        }
        lock_scroll(dom, &lock, &env);
        dom.set_attribute(nodes.wrapper, "aria-hidden", "false");

        let mut event = Event::new(EventKind::custom(OPENED_EVENT));
        dom.dispatch_event(EventTarget::Node(nodes.wrapper), &mut event);
        if self.state() != Visibility::Opening {
            return;
        }

        let this = self.clone();
        let wait = gate.after(dom, move |dom: &mut dyn Dom| this.establish_focus(dom));
        self.park(wait);
    }

    /// Hide the modal.
    pub fn close(&self, dom: &mut dyn Dom) {
        let (id, nodes, visible, gate, pending, restore) = {
            let mut inner = self.inner.borrow_mut();
            if !matches!(inner.state, Visibility::Open | Visibility::Opening) {
                tracing::warn!(modal_id = %inner.id, state = ?inner.state, "close ignored");
                return;
            }
            inner.state = Visibility::Closing;
            (
                inner.id,
                inner.nodes,
                inner.visible_classes.clone(),
                inner.gate,
                inner.pending.take(),
                inner.trap.last_focused,
            )
        };
        tracing::debug!(modal_id = %id, "closing");

        if let Some(wait) = pending {
            wait.cancel(dom);
        }
        for class in &visible {
            dom.remove_class(nodes.wrapper, class);
        }
        if let Some(previous) = restore {
            dom.focus(previous);
        }
        // No attached element to return to; focus must not stay in the hidden dialog.
        if dom
            .active_element()
            .is_some_and(|active| dom.contains(nodes.wrapper, active))
        {
            let body = dom.body();
            dom.focus(body);
        }

        let this = self.clone();
        let wait = gate.after(dom, move |dom: &mut dyn Dom| this.finish_close(dom));
        self.park(wait);
    }

    /// Keyboard handling for the wrapper: Escape closes, Tab wraps.
    pub fn handle_key(&self, dom: &mut dyn Dom, event: &mut Event) {
        let Some(key) = event.key() else {
            return;
        };
        let (state, trap) = {
            let inner = self.inner.borrow();
            (inner.state, inner.trap)
        };
        match key.code {
            KeyCode::Escape if matches!(state, Visibility::Open | Visibility::Opening) => {
                self.close(dom);
            }
            KeyCode::Tab if state == Visibility::Open => {
                let active = dom.active_element();
                let (edge, wrap_to) = if key.shift() {
                    (trap.first, trap.last)
                } else {
                    (trap.last, trap.first)
                };
                if let (Some(edge), Some(wrap_to)) = (edge, wrap_to) {
                    if active == Some(edge) {
                        event.prevent_default();
                        dom.focus(wrap_to);
                    }
                }
            }
            _ => {}
        }
    }

    fn park(&self, wait: TransitionWait) {
        if !wait.is_complete() {
            self.inner.borrow_mut().pending = Some(wait);
        }
    }

    fn establish_focus(&self, dom: &mut dyn Dom) {
        let (id, dialog) = {
            let inner = self.inner.borrow();
            if inner.state != Visibility::Opening {
                return;
            }
            (inner.id, inner.nodes.dialog)
        };
        let focusable = match dom.query_selector_all(Some(dialog), FOCUSABLE_SELECTOR) {
            Ok(nodes) => nodes,
            Err(err) => {
                tracing::error!(modal_id = %id, %err, "focusable query failed");
                Vec::new()
            }
        };
        let first = focusable.first().copied();
        let last = focusable.last().copied();
        if let Some(first) = first {
            dom.focus(first);
        }

        let mut inner = self.inner.borrow_mut();
        inner.trap.first = first;
        inner.trap.last = last;
        inner.pending = None;
        inner.state = Visibility::Open;
        tracing::debug!(modal_id = %id, focusable = focusable.len(), "open");
    }

    fn finish_close(&self, dom: &mut dyn Dom) {
        let (id, wrapper, lock) = {
            let mut inner = self.inner.borrow_mut();
            if inner.state != Visibility::Closing {
                return;
            }
            inner.state = Visibility::Closed;
            inner.pending = None;
            (
                inner.id,
                inner.nodes.wrapper,
                inner.scroll_lock_classes.clone(),
            )
        };
        unlock_scroll(dom, &lock);
        dom.set_attribute(wrapper, "aria-hidden", "true");
        tracing::debug!(modal_id = %id, "closed");

        let mut event = Event::new(EventKind::custom(CLOSED_EVENT));
        dom.dispatch_event(EventTarget::Node(wrapper), &mut event);
    }
}

fn lock_scroll(dom: &mut dyn Dom, classes: &[String], env: &Environment) {
    let body = dom.body();
    for class in classes {
        dom.add_class(body, class);
    }
    let margin = if env.is_page_scrollable() {
        format!("{}px", env.scrollbar_width(dom))
    } else {
        String::new()
    };
    dom.set_style(body, "margin-right", &margin);
}

fn unlock_scroll(dom: &mut dyn Dom, classes: &[String]) {
    let body = dom.body();
    for class in classes {
        dom.remove_class(body, class);
    }
    dom.set_style(body, "margin-right", "");
}
