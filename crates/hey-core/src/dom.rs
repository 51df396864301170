#![forbid(unsafe_code)]

//! The [`Dom`] capability trait.
//!
//! # Invariants
//!
//! 1. Node ids are never reused by a host; a detached node keeps its id.
//! 2. `query_selector*` only matches descendants of the scope (never the
//!    scope itself), in document order.
//! 3. Listeners receive the host mutably and may add/remove listeners or
//!    mutate the tree while a dispatch is in progress. A listener removed
//!    during a dispatch does not run later in that dispatch.
//! 4. Timers never fire re-entrantly from inside `set_timeout`.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Bad selector | Unsupported or malformed syntax | `Err(SelectorError)` |
//! | Unknown node | Id from another host | Host-defined; `MemoryDom` panics |
//! | Unknown listener/timer id | Already removed | No-op, returns `false` |

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use crate::event::{Event, EventKind, EventTarget};
use crate::selector::SelectorError;

/// Elements that take part in sequential (Tab) focus navigation.
pub const FOCUSABLE_SELECTOR: &str = "a[href], area[href], input:not([disabled]), \
    select:not([disabled]), textarea:not([disabled]), button:not([disabled]), [tabindex=\"0\"]";

/// Handle to an element owned by a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Wrap a raw host index.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw host index.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Registration handle returned by [`Dom::add_event_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

/// Handle returned by [`Dom::set_timeout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

impl TimerId {
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

/// Event callback. Shared so a host can snapshot listeners before calling them.
pub type Listener = Rc<dyn Fn(&mut dyn Dom, &mut Event)>;

/// Deferred work scheduled with [`Dom::set_timeout`].
pub type Task = Box<dyn FnOnce(&mut dyn Dom)>;

/// Tree, event and timer capability of a hosting environment.
pub trait Dom {
    // --- Tree ---

    /// The document body; modals mount here.
    fn body(&self) -> NodeId;

    /// Create a detached element.
    fn create_element(&mut self, tag: &str) -> NodeId;

    /// Lower-case tag name of an element.
    fn tag(&self, node: NodeId) -> String;

    /// Append `child` as the last child of `parent`, detaching it first.
    fn append_child(&mut self, parent: NodeId, child: NodeId);

    /// Remove `child` from `parent`. Returns `false` if it was not a child.
    fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Element children in order.
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    /// Whether `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    // --- Attributes & classes ---

    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);

    fn remove_attribute(&mut self, node: NodeId, name: &str);

    fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.attribute(node, name).is_some()
    }

    fn add_class(&mut self, node: NodeId, class: &str);

    fn remove_class(&mut self, node: NodeId, class: &str);

    fn has_class(&self, node: NodeId, class: &str) -> bool;

    // --- Markup ---

    /// Serialised markup of the node's children.
    fn inner_html(&self, node: NodeId) -> String;

    /// Replace the node's children with parsed `markup`.
    fn set_inner_html(&mut self, node: NodeId, markup: &str);

    // --- Queries ---

    /// First descendant of `scope` (or of the document when `None`) matching `selector`.
    fn query_selector(
        &self,
        scope: Option<NodeId>,
        selector: &str,
    ) -> Result<Option<NodeId>, SelectorError>;

    /// All matching descendants, in document order.
    fn query_selector_all(
        &self,
        scope: Option<NodeId>,
        selector: &str,
    ) -> Result<Vec<NodeId>, SelectorError>;

    // --- Style & metrics ---

    /// Set an inline style property. An empty value clears it.
    fn set_style(&mut self, node: NodeId, property: &str, value: &str);

    /// Inline style property, if set.
    fn style(&self, node: NodeId, property: &str) -> Option<String>;

    /// Resolved style property as the renderer sees it.
    fn computed_style(&self, node: NodeId, property: &str) -> Option<String>;

    fn offset_width(&self, node: NodeId) -> f64;

    fn offset_height(&self, node: NodeId) -> f64;

    fn client_width(&self, node: NodeId) -> f64;

    /// Height of the layout viewport (`window.innerHeight`).
    fn viewport_height(&self) -> f64;

    /// Whether the style engine recognises `property` (e.g. `transition`).
    fn supports_style_property(&self, property: &str) -> bool;

    // --- Focus ---

    fn active_element(&self) -> Option<NodeId>;

    fn focus(&mut self, node: NodeId);

    // --- Events ---

    fn add_event_listener(
        &mut self,
        target: EventTarget,
        kind: EventKind,
        listener: Listener,
    ) -> ListenerId;

    /// Returns `false` if the id was unknown or already removed.
    fn remove_event_listener(&mut self, id: ListenerId) -> bool;

    /// Deliver `event` to `target`, bubbling through ancestors for node targets.
    fn dispatch_event(&mut self, target: EventTarget, event: &mut Event);

    // --- Timers ---

    fn set_timeout(&mut self, delay: Duration, task: Task) -> TimerId;

    /// Returns `false` if the timer already fired or was cleared.
    fn clear_timeout(&mut self, id: TimerId) -> bool;
}
