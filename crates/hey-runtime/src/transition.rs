#![forbid(unsafe_code)]

//! Transition-gated continuations.
//!
//! Visual state changes (showing or hiding a modal) are followed by work
//! that must wait until the CSS transition has finished. The gate models
//! that wait explicitly:
//!
//! ```text
//!            transitions supported?
//!             /                  \
//!           no                    yes
//!           |                      |
//!   run continuation now     Awaiting(OnceListener)
//!   -> Complete                    | transitionend on the node itself
//!                                  v
//!                          run continuation, listener removed
//! ```
//!
//! There is no timeout: a host that never reports the end of a transition
//! leaves the wait pending.

use hey_core::{Dom, EventKind, EventTarget, NodeId};

use crate::once::{OnceListener, listen_once};

/// Outcome of [`TransitionGate::after`].
#[derive(Debug, Clone)]
pub enum TransitionWait {
    /// The continuation already ran.
    Complete,
    /// The continuation runs on the next `transitionend` fired on the node.
    Awaiting(OnceListener),
}

impl TransitionWait {
    #[inline]
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }

    /// Abandon a pending wait. Returns `true` if a continuation was dropped.
    pub fn cancel(self, dom: &mut dyn Dom) -> bool {
        match self {
            Self::Complete => false,
            Self::Awaiting(listener) => listener.cancel(dom),
        }
    }
}

/// Sequencing of post-transition work for one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionGate {
    node: NodeId,
    transitions: bool,
}

impl TransitionGate {
    pub const fn new(node: NodeId, transitions: bool) -> Self {
        Self { node, transitions }
    }

    #[inline]
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Run `continuation` once the node's transition ends.
    ///
    /// Transition ends that bubble up from descendants are ignored.
    pub fn after(
        &self,
        dom: &mut dyn Dom,
        continuation: impl FnOnce(&mut dyn Dom) + 'static,
    ) -> TransitionWait {
        if !self.transitions {
            continuation(dom);
            return TransitionWait::Complete;
        }
        let node = self.node;
        let listener = listen_once(
            dom,
            EventTarget::Node(node),
            EventKind::TransitionEnd,
            move |event| event.target() == EventTarget::Node(node),
            move |dom, _| continuation(dom),
        );
        tracing::trace!(%node, "awaiting transition end");
        TransitionWait::Awaiting(listener)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hey_core::MemoryDom;
    use std::cell::Cell;
    use std::rc::Rc;

    fn flag() -> (Rc<Cell<bool>>, impl FnOnce(&mut dyn Dom) + 'static) {
        let done = Rc::new(Cell::new(false));
        let set = Rc::clone(&done);
        (done, move |_: &mut dyn Dom| set.set(true))
    }

    #[test]
    fn without_transitions_runs_synchronously() {
        let mut dom = MemoryDom::new();
        let node = dom.create_element("div");
        let (done, continuation) = flag();
        let wait = TransitionGate::new(node, false).after(&mut dom, continuation);
        assert!(wait.is_complete());
        assert!(done.get());
        assert_eq!(dom.listener_count(node.into(), &EventKind::TransitionEnd), 0);
    }

    #[test]
    fn with_transitions_waits_for_own_transition_end() {
        let mut dom = MemoryDom::new();
        let node = dom.create_element("div");
        let child = dom.create_element("button");
        dom.append_child(node, child);
        let (done, continuation) = flag();
        let wait = TransitionGate::new(node, true).after(&mut dom, continuation);
        assert!(!wait.is_complete());
        dom.end_transition(child);
        assert!(!done.get());
        dom.end_transition(node);
        assert!(done.get());
        assert_eq!(dom.listener_count(node.into(), &EventKind::TransitionEnd), 0);
    }

    #[test]
    fn cancelled_wait_never_runs() {
        let mut dom = MemoryDom::new();
        let node = dom.create_element("div");
        let (done, continuation) = flag();
        let wait = TransitionGate::new(node, true).after(&mut dom, continuation);
        assert!(wait.cancel(&mut dom));
        dom.end_transition(node);
        assert!(!done.get());
    }
}
