#![forbid(unsafe_code)]

//! Events delivered through [`Dom::dispatch_event`](crate::Dom::dispatch_event).

use std::borrow::Cow;

use bitflags::bitflags;

use crate::dom::NodeId;

/// Where an event is dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTarget {
    /// The top-level window (resize notifications).
    Window,
    /// An element in the tree.
    Node(NodeId),
}

impl EventTarget {
    /// The node, if this target is one.
    #[inline]
    pub const fn node(self) -> Option<NodeId> {
        match self {
            Self::Node(node) => Some(node),
            Self::Window => None,
        }
    }
}

impl From<NodeId> for EventTarget {
    fn from(node: NodeId) -> Self {
        Self::Node(node)
    }
}

/// Kind of event.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    KeyDown,
    TouchMove,
    /// A CSS transition finished on the target.
    TransitionEnd,
    /// Viewport size changed. Dispatched on [`EventTarget::Window`].
    Resize,
    /// Application-defined notification, e.g. `heyOpen`.
    Custom(Cow<'static, str>),
}

impl EventKind {
    /// Build a custom event kind.
    pub fn custom(name: impl Into<Cow<'static, str>>) -> Self {
        Self::Custom(name.into())
    }
}

bitflags! {
    /// Modifier keys held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL  = 0b0010;
        const ALT   = 0b0100;
        const META  = 0b1000;
    }
}

/// Key identity for keyboard events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Tab,
    Escape,
    Enter,
    Backspace,
    Up,
    Down,
    Left,
    Right,
    Char(char),
}

/// A keyboard event payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub const fn new(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    #[inline]
    pub const fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }
}

/// A dispatched event.
///
/// `target` is where the event was fired; `current_target` is the node whose
/// listeners are running. Both `prevent_default` and `stop_propagation` are
/// sticky for the rest of the dispatch.
#[derive(Debug, Clone)]
pub struct Event {
    kind: EventKind,
    target: EventTarget,
    current_target: EventTarget,
    key: Option<KeyEvent>,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl Event {
    /// Create an event of the given kind. The dispatcher fills in targets.
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            target: EventTarget::Window,
            current_target: EventTarget::Window,
            key: None,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// Create a keydown event.
    pub fn key_down(key: KeyEvent) -> Self {
        Self {
            key: Some(key),
            ..Self::new(EventKind::KeyDown)
        }
    }

    #[inline]
    pub fn kind(&self) -> &EventKind {
        &self.kind
    }

    #[inline]
    pub fn target(&self) -> EventTarget {
        self.target
    }

    #[inline]
    pub fn current_target(&self) -> EventTarget {
        self.current_target
    }

    #[inline]
    pub fn key(&self) -> Option<KeyEvent> {
        self.key
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    #[inline]
    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    #[inline]
    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    /// Set the dispatch target. Called by hosts before delivery.
    pub fn set_target(&mut self, target: EventTarget) {
        self.target = target;
        self.current_target = target;
    }

    /// Set the node whose listeners are about to run. Called by hosts.
    pub fn set_current_target(&mut self, target: EventTarget) {
        self.current_target = target;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_down_carries_modifiers() {
        let event = Event::key_down(KeyEvent::new(KeyCode::Tab, Modifiers::SHIFT));
        assert_eq!(event.kind(), &EventKind::KeyDown);
        assert!(event.key().is_some_and(|k| k.shift()));
    }

    #[test]
    fn flags_are_sticky() {
        let mut event = Event::new(EventKind::Click);
        assert!(!event.default_prevented());
        event.prevent_default();
        event.stop_propagation();
        assert!(event.default_prevented());
        assert!(event.propagation_stopped());
    }

    #[test]
    fn set_target_resets_current_target() {
        let mut event = Event::new(EventKind::Click);
        event.set_current_target(EventTarget::Node(NodeId::from_raw(3)));
        event.set_target(EventTarget::Node(NodeId::from_raw(7)));
        assert_eq!(event.current_target(), EventTarget::Node(NodeId::from_raw(7)));
        assert_eq!(event.target().node(), Some(NodeId::from_raw(7)));
    }
}
