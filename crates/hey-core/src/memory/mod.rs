#![forbid(unsafe_code)]

//! Headless, deterministic [`Dom`] implementation.
//!
//! `MemoryDom` keeps the tree in an arena, simulates the few layout metrics
//! modal code reads, and drives timers from a virtual clock. Nothing happens
//! "by itself": transitions end when [`MemoryDom::end_transition`] is
//! called and timers fire on [`MemoryDom::advance`].
//!
//! # Invariants
//!
//! 1. Node ids index the arena and are never reused.
//! 2. Timers fire in due-time order; ties fire in scheduling order.
//! 3. Detaching a subtree that holds focus clears the active element.
//!
//! # Example
//!
//! ```
//! use hey_core::{Dom, MemoryDom};
//!
//! let mut dom = MemoryDom::new();
//! let body = dom.body();
//! let panel = dom.create_element("div");
//! dom.set_attribute(panel, "id", "panel-1");
//! dom.append_child(body, panel);
//! assert_eq!(dom.query_selector(None, "#panel-1").unwrap(), Some(panel));
//! ```

mod markup;

use std::time::Duration;

use ahash::AHashSet;

use crate::dom::{Dom, FOCUSABLE_SELECTOR, Listener, ListenerId, NodeId, Task, TimerId};
use crate::event::{Event, EventKind, EventTarget, KeyCode, KeyEvent, Modifiers};
use crate::selector::{MatchContext, Selector, SelectorError};

use self::markup::Fragment;

/// Simulated environment characteristics.
#[derive(Debug, Clone)]
pub struct HostProfile {
    /// Style properties the style engine recognises.
    pub style_properties: AHashSet<String>,
    /// Width of a native scrollbar in px.
    pub scrollbar_width: f64,
    /// Initial viewport height in px.
    pub viewport_height: f64,
}

impl HostProfile {
    /// An evergreen browser: transitions and flexbox available.
    pub fn modern() -> Self {
        let style_properties = [
            "display",
            "overflow",
            "position",
            "width",
            "height",
            "max-height",
            "margin-right",
            "transition",
            "flex-wrap",
        ]
        .into_iter()
        .map(str::to_owned)
        .collect();
        Self {
            style_properties,
            scrollbar_width: 15.0,
            viewport_height: 768.0,
        }
    }

    /// An old engine with neither transitions nor flexbox.
    pub fn legacy() -> Self {
        Self::modern()
            .without_style_property("transition")
            .without_style_property("flex-wrap")
    }

    #[must_use]
    pub fn with_style_property(mut self, property: &str) -> Self {
        self.style_properties.insert(property.to_owned());
        self
    }

    #[must_use]
    pub fn without_style_property(mut self, property: &str) -> Self {
        self.style_properties.remove(property);
        self
    }

    #[must_use]
    pub fn scrollbar_width(mut self, width: f64) -> Self {
        self.scrollbar_width = width;
        self
    }

    #[must_use]
    pub fn viewport_height(mut self, height: f64) -> Self {
        self.viewport_height = height;
        self
    }
}

impl Default for HostProfile {
    fn default() -> Self {
        Self::modern()
    }
}

/// Explicit box size for a node, overriding inline `width`/`height`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Layout {
    pub width: f64,
    pub height: f64,
}

impl Layout {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug)]
enum NodeKind {
    Element(String),
    Text(String),
}

#[derive(Debug)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attributes: Vec<(String, String)>,
    style: Vec<(String, String)>,
    computed: Vec<(String, String)>,
    layout: Option<Layout>,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            attributes: Vec::new(),
            style: Vec::new(),
            computed: Vec::new(),
            layout: None,
        }
    }
}

struct ListenerEntry {
    id: ListenerId,
    target: EventTarget,
    kind: EventKind,
    listener: Listener,
}

struct PendingTimer {
    id: TimerId,
    due: Duration,
    seq: u64,
    task: Task,
}

/// Arena-backed headless document.
pub struct MemoryDom {
    nodes: Vec<NodeData>,
    root: NodeId,
    body: NodeId,
    profile: HostProfile,
    viewport_height: f64,
    active: Option<NodeId>,
    listeners: Vec<ListenerEntry>,
    next_listener: u64,
    timers: Vec<PendingTimer>,
    next_timer: u64,
    now: Duration,
}

impl std::fmt::Debug for MemoryDom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryDom")
            .field("nodes", &self.nodes.len())
            .field("listeners", &self.listeners.len())
            .field("timers", &self.timers.len())
            .field("now", &self.now)
            .finish()
    }
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    /// Empty document (`<html><body></body></html>`) with the modern profile.
    pub fn new() -> Self {
        Self::with_profile(HostProfile::modern())
    }

    /// Empty document simulating `profile`.
    pub fn with_profile(profile: HostProfile) -> Self {
        let mut dom = Self {
            nodes: Vec::new(),
            root: NodeId::from_raw(0),
            body: NodeId::from_raw(0),
            viewport_height: profile.viewport_height,
            profile,
            active: None,
            listeners: Vec::new(),
            next_listener: 1,
            timers: Vec::new(),
            next_timer: 1,
            now: Duration::ZERO,
        };
        dom.root = dom.create_element("html");
        dom.body = dom.create_element("body");
        dom.append_child(dom.root, dom.body);
        dom
    }

    /// The `<html>` element.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn profile(&self) -> &HostProfile {
        &self.profile
    }

    /// Parse `markup` and append it to the body. Returns the new top-level elements.
    pub fn append_markup(&mut self, markup: &str) -> Vec<NodeId> {
        let body = self.body;
        self.insert_fragments(body, markup::parse(markup))
    }

    /// Force a node's box size.
    pub fn set_layout(&mut self, node: NodeId, layout: Layout) {
        self.node_mut(node).layout = Some(layout);
    }

    /// Override a resolved style value (as a stylesheet would).
    pub fn set_computed_style(&mut self, node: NodeId, property: &str, value: &str) {
        upsert(&mut self.node_mut(node).computed, property, value);
    }

    /// Whether `node` is connected to the document.
    pub fn is_attached(&self, node: NodeId) -> bool {
        self.contains(self.root, node)
    }

    /// Concatenated text of the node's subtree.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    /// Number of listeners registered for `kind` on `target`.
    pub fn listener_count(&self, target: EventTarget, kind: &EventKind) -> usize {
        self.listeners
            .iter()
            .filter(|entry| entry.target == target && entry.kind == *kind)
            .count()
    }

    /// Timers scheduled but not yet fired.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Move the virtual clock forward, firing every timer that falls due.
    pub fn advance(&mut self, by: Duration) {
        let until = self.now + by;
        while let Some(index) = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, timer)| timer.due <= until)
            .min_by_key(|(_, timer)| (timer.due, timer.seq))
            .map(|(index, _)| index)
        {
            let timer = self.timers.remove(index);
            self.now = timer.due;
            #[cfg(feature = "tracing")]
            tracing::trace!(timer = ?timer.id, now = ?self.now, "timer fired");
            (timer.task)(self);
        }
        self.now = until;
    }

    /// Simulate a user click on `node`. Returns the dispatched event.
    pub fn click(&mut self, node: NodeId) -> Event {
        let mut event = Event::new(EventKind::Click);
        self.dispatch_event(EventTarget::Node(node), &mut event);
        event
    }

    /// Simulate a touch drag over `node`.
    pub fn touch_move(&mut self, node: NodeId) -> Event {
        let mut event = Event::new(EventKind::TouchMove);
        self.dispatch_event(EventTarget::Node(node), &mut event);
        event
    }

    /// Simulate a key press on the focused element (or the body).
    ///
    /// An unprevented Tab moves focus to the next focusable element in
    /// document order; Shift+Tab to the previous one.
    pub fn press_key(&mut self, code: KeyCode, modifiers: Modifiers) -> Event {
        let target = self.active.unwrap_or(self.body);
        let key = KeyEvent::new(code, modifiers);
        let mut event = Event::key_down(key);
        self.dispatch_event(EventTarget::Node(target), &mut event);
        if code == KeyCode::Tab && !event.default_prevented() {
            self.sequential_focus(key.shift());
        }
        event
    }

    /// Signal that a CSS transition finished on `node`.
    pub fn end_transition(&mut self, node: NodeId) -> Event {
        let mut event = Event::new(EventKind::TransitionEnd);
        self.dispatch_event(EventTarget::Node(node), &mut event);
        event
    }

    /// Change the viewport height and notify window resize listeners.
    pub fn resize(&mut self, viewport_height: f64) {
        self.viewport_height = viewport_height;
        let mut event = Event::new(EventKind::Resize);
        self.dispatch_event(EventTarget::Window, &mut event);
    }

    fn sequential_focus(&mut self, backwards: bool) {
        let order = self.descendants_matching(self.root, &focusable_selector());
        let next = match (self.active.and_then(|a| order.iter().position(|n| *n == a)), backwards) {
            (Some(i), false) => order.get(i + 1).copied(),
            (Some(i), true) => i.checked_sub(1).map(|i| order[i]),
            (None, false) => order.first().copied(),
            (None, true) => order.last().copied(),
        };
        self.active = next;
    }

    fn node(&self, node: NodeId) -> &NodeData {
        &self.nodes[node.index()]
    }

    fn node_mut(&mut self, node: NodeId) -> &mut NodeData {
        &mut self.nodes[node.index()]
    }

    fn push_node(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId::from_raw(self.nodes.len() as u32);
        self.nodes.push(NodeData::new(kind));
        id
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.node(node).parent {
            self.node_mut(parent).children.retain(|c| *c != node);
            self.node_mut(node).parent = None;
            if self.active.is_some_and(|a| self.contains(node, a)) {
                self.active = None;
            }
        }
    }

    fn insert_fragments(&mut self, parent: NodeId, fragments: Vec<Fragment>) -> Vec<NodeId> {
        let mut inserted = Vec::new();
        for fragment in fragments {
            let node = match fragment {
                Fragment::Text(text) => self.push_node(NodeKind::Text(text)),
                Fragment::Element {
                    tag,
                    attributes,
                    children,
                } => {
                    let node = self.push_node(NodeKind::Element(tag));
                    self.node_mut(node).attributes = attributes;
                    self.insert_fragments(node, children);
                    inserted.push(node);
                    node
                }
            };
            self.node_mut(node).parent = Some(parent);
            self.node_mut(parent).children.push(node);
        }
        inserted
    }

    fn serialize_into(&self, node: NodeId, out: &mut String) {
        match &self.node(node).kind {
            NodeKind::Text(text) => out.push_str(&markup::escape_text(text)),
            NodeKind::Element(tag) => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in &self.node(node).attributes {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&markup::escape_attribute(value));
                    out.push('"');
                }
                out.push('>');
                if !markup::is_void(tag) {
                    for child in &self.node(node).children {
                        self.serialize_into(*child, out);
                    }
                    out.push_str("</");
                    out.push_str(tag);
                    out.push('>');
                }
            }
        }
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        match &self.node(node).kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Element(_) => {
                for child in &self.node(node).children {
                    self.collect_text(*child, out);
                }
            }
        }
    }

    fn descendants_matching(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = self.node(scope).children.iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            if selector.matches(self, node) {
                found.push(node);
            }
            stack.extend(self.node(node).children.iter().rev().copied());
        }
        found
    }

    fn px(&self, node: NodeId, property: &str) -> Option<f64> {
        self.style(node, property)
            .and_then(|v| v.trim().trim_end_matches("px").parse().ok())
    }

    fn class_list(&self, node: NodeId) -> Vec<String> {
        self.attribute(node, "class")
            .map(|list| list.split_ascii_whitespace().map(str::to_owned).collect())
            .unwrap_or_default()
    }
}

fn focusable_selector() -> Selector {
    Selector::parse(FOCUSABLE_SELECTOR).expect("focusable selector is valid")
}

fn upsert(pairs: &mut Vec<(String, String)>, name: &str, value: &str) {
    match pairs.iter_mut().find(|(n, _)| n == name) {
        Some((_, existing)) => value.clone_into(existing),
        None => pairs.push((name.to_owned(), value.to_owned())),
    }
}

impl MatchContext for MemoryDom {
    fn tag_of(&self, node: NodeId) -> Option<&str> {
        match &self.node(node).kind {
            NodeKind::Element(tag) => Some(tag.as_str()),
            NodeKind::Text(_) => None,
        }
    }

    fn attribute_of(&self, node: NodeId, name: &str) -> Option<&str> {
        self.node(node)
            .attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).parent
    }
}

impl Dom for MemoryDom {
    fn body(&self) -> NodeId {
        self.body
    }

    fn create_element(&mut self, tag: &str) -> NodeId {
        self.push_node(NodeKind::Element(tag.to_ascii_lowercase()))
    }

    fn tag(&self, node: NodeId) -> String {
        self.tag_of(node).unwrap_or("#text").to_owned()
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.push(child);
    }

    fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if self.node(child).parent != Some(parent) {
            return false;
        }
        self.detach(child);
        true
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).parent
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.node(node)
            .children
            .iter()
            .copied()
            .filter(|c| self.tag_of(*c).is_some())
            .collect()
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.attribute_of(node, name).map(str::to_owned)
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        upsert(&mut self.node_mut(node).attributes, &name.to_ascii_lowercase(), value);
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) {
        self.node_mut(node).attributes.retain(|(n, _)| n != name);
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        let mut classes = self.class_list(node);
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_owned());
            self.set_attribute(node, "class", &classes.join(" "));
        }
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        let classes = self.class_list(node);
        if classes.iter().any(|c| c == class) {
            let kept: Vec<String> = classes.into_iter().filter(|c| c != class).collect();
            self.set_attribute(node, "class", &kept.join(" "));
        }
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.attribute_of(node, "class")
            .is_some_and(|list| list.split_ascii_whitespace().any(|c| c == class))
    }

    fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        for child in &self.node(node).children {
            self.serialize_into(*child, &mut out);
        }
        out
    }

    fn set_inner_html(&mut self, node: NodeId, markup: &str) {
        for child in self.node(node).children.clone() {
            self.detach(child);
        }
        self.insert_fragments(node, markup::parse(markup));
    }

    fn query_selector(
        &self,
        scope: Option<NodeId>,
        selector: &str,
    ) -> Result<Option<NodeId>, SelectorError> {
        Ok(self.query_selector_all(scope, selector)?.into_iter().next())
    }

    fn query_selector_all(
        &self,
        scope: Option<NodeId>,
        selector: &str,
    ) -> Result<Vec<NodeId>, SelectorError> {
        let selector = Selector::parse(selector)?;
        Ok(self.descendants_matching(scope.unwrap_or(self.root), &selector))
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        let style = &mut self.node_mut(node).style;
        if value.is_empty() {
            style.retain(|(n, _)| n != property);
        } else {
            upsert(style, property, value);
        }
    }

    fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.node(node)
            .style
            .iter()
            .find(|(n, _)| n == property)
            .map(|(_, v)| v.clone())
    }

    fn computed_style(&self, node: NodeId, property: &str) -> Option<String> {
        self.node(node)
            .computed
            .iter()
            .find(|(n, _)| n == property)
            .map(|(_, v)| v.clone())
            .or_else(|| self.style(node, property))
    }

    fn offset_width(&self, node: NodeId) -> f64 {
        self.node(node)
            .layout
            .map(|l| l.width)
            .or_else(|| self.px(node, "width"))
            .unwrap_or(0.0)
    }

    fn offset_height(&self, node: NodeId) -> f64 {
        self.node(node)
            .layout
            .map(|l| l.height)
            .or_else(|| self.px(node, "height"))
            .unwrap_or(0.0)
    }

    fn client_width(&self, node: NodeId) -> f64 {
        let width = self.offset_width(node);
        if self.style(node, "overflow").as_deref() == Some("scroll") {
            (width - self.profile.scrollbar_width).max(0.0)
        } else {
            width
        }
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    fn supports_style_property(&self, property: &str) -> bool {
        self.profile.style_properties.contains(property)
    }

    fn active_element(&self) -> Option<NodeId> {
        self.active
    }

    fn focus(&mut self, node: NodeId) {
        if self.is_attached(node) {
            self.active = Some(node);
        }
    }

    fn add_event_listener(
        &mut self,
        target: EventTarget,
        kind: EventKind,
        listener: Listener,
    ) -> ListenerId {
        let id = ListenerId::from_raw(self.next_listener);
        self.next_listener += 1;
        self.listeners.push(ListenerEntry {
            id,
            target,
            kind,
            listener,
        });
        id
    }

    fn remove_event_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|entry| entry.id != id);
        self.listeners.len() != before
    }

    fn dispatch_event(&mut self, target: EventTarget, event: &mut Event) {
        event.set_target(target);
        let path: Vec<EventTarget> = match target {
            EventTarget::Window => vec![EventTarget::Window],
            EventTarget::Node(node) => {
                let mut path = vec![EventTarget::Node(node)];
                let mut cursor = self.node(node).parent;
                while let Some(parent) = cursor {
                    path.push(EventTarget::Node(parent));
                    cursor = self.node(parent).parent;
                }
                path
            }
        };
        #[cfg(feature = "tracing")]
        tracing::trace!(kind = ?event.kind(), ?target, depth = path.len(), "dispatch");

        for current in path {
            event.set_current_target(current);
            let snapshot: Vec<(ListenerId, Listener)> = self
                .listeners
                .iter()
                .filter(|entry| entry.target == current && entry.kind == *event.kind())
                .map(|entry| (entry.id, Listener::clone(&entry.listener)))
                .collect();
            for (id, listener) in snapshot {
                if self.listeners.iter().any(|entry| entry.id == id) {
                    listener(self, event);
                }
            }
            if event.propagation_stopped() {
                break;
            }
        }
    }

    fn set_timeout(&mut self, delay: Duration, task: Task) -> TimerId {
        let seq = self.next_timer;
        self.next_timer += 1;
        let id = TimerId::from_raw(seq);
        self.timers.push(PendingTimer {
            id,
            due: self.now + delay,
            seq,
            task,
        });
        id
    }

    fn clear_timeout(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|timer| timer.id != id);
        self.timers.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder() -> (Rc<RefCell<Vec<String>>>, impl Fn(&str) -> Listener) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let make = {
            let log = Rc::clone(&log);
            move |name: &str| -> Listener {
                let log = Rc::clone(&log);
                let name = name.to_owned();
                Rc::new(move |_dom: &mut dyn Dom, _event: &mut Event| {
                    log.borrow_mut().push(name.clone());
                })
            }
        };
        (log, make)
    }

    #[test]
    fn markup_round_trips_through_inner_html() {
        let mut dom = MemoryDom::new();
        let host = dom.create_element("div");
        dom.set_inner_html(host, "<p class=\"a\">Hello <em>world</em></p><br>");
        assert_eq!(
            dom.inner_html(host),
            "<p class=\"a\">Hello <em>world</em></p><br>"
        );
        assert_eq!(dom.text_content(host), "Hello world");
    }

    #[test]
    fn classes_are_a_token_list() {
        let mut dom = MemoryDom::new();
        let node = dom.create_element("div");
        dom.add_class(node, "a");
        dom.add_class(node, "b");
        dom.add_class(node, "a");
        assert_eq!(dom.attribute(node, "class").as_deref(), Some("a b"));
        dom.remove_class(node, "a");
        assert!(!dom.has_class(node, "a"));
        assert!(dom.has_class(node, "b"));
    }

    #[test]
    fn query_is_scoped_to_descendants() {
        let mut dom = MemoryDom::new();
        let roots = dom.append_markup(
            "<div id=\"outer\" data-hey-title=\"x\"><span data-hey-title>in</span></div>",
        );
        let outer = roots[0];
        let inner = dom.query_selector(Some(outer), "[data-hey-title]").unwrap();
        assert_ne!(inner, Some(outer));
        assert_eq!(inner.map(|n| dom.tag(n)).as_deref(), Some("span"));
        assert_eq!(
            dom.query_selector(None, "[data-hey-title]").unwrap(),
            Some(outer)
        );
        assert!(dom.query_selector(None, "a:hover").is_err());
    }

    #[test]
    fn events_bubble_until_stopped() {
        let mut dom = MemoryDom::new();
        let outer = dom.create_element("div");
        let inner = dom.create_element("button");
        let body = dom.body();
        dom.append_child(body, outer);
        dom.append_child(outer, inner);

        let (log, make) = recorder();
        dom.add_event_listener(inner.into(), EventKind::Click, make("inner"));
        dom.add_event_listener(outer.into(), EventKind::Click, make("outer"));
        dom.add_event_listener(body.into(), EventKind::Click, make("body"));
        dom.click(inner);
        assert_eq!(*log.borrow(), ["inner", "outer", "body"]);

        log.borrow_mut().clear();
        dom.add_event_listener(
            outer.into(),
            EventKind::Click,
            Rc::new(|_: &mut dyn Dom, e: &mut Event| e.stop_propagation()),
        );
        dom.click(inner);
        assert_eq!(*log.borrow(), ["inner", "outer"]);
    }

    #[test]
    fn listener_removed_mid_dispatch_does_not_run() {
        let mut dom = MemoryDom::new();
        let node = dom.create_element("div");
        let (log, make) = recorder();
        let victim = Rc::new(RefCell::new(None::<ListenerId>));
        let remover: Listener = {
            let victim = Rc::clone(&victim);
            Rc::new(move |dom: &mut dyn Dom, _: &mut Event| {
                if let Some(id) = victim.borrow_mut().take() {
                    dom.remove_event_listener(id);
                }
            })
        };
        dom.add_event_listener(node.into(), EventKind::Click, remover);
        let id = dom.add_event_listener(node.into(), EventKind::Click, make("victim"));
        *victim.borrow_mut() = Some(id);
        dom.click(node);
        assert!(log.borrow().is_empty());
        assert_eq!(dom.listener_count(node.into(), &EventKind::Click), 1);
    }

    #[test]
    fn timers_fire_in_due_order() {
        let mut dom = MemoryDom::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for (name, ms) in [("late", 30u64), ("early", 10), ("tie", 10)] {
            let log = Rc::clone(&log);
            dom.set_timeout(
                Duration::from_millis(ms),
                Box::new(move |_| log.borrow_mut().push(name)),
            );
        }
        dom.advance(Duration::from_millis(20));
        assert_eq!(*log.borrow(), ["early", "tie"]);
        assert_eq!(dom.pending_timers(), 1);
        dom.advance(Duration::from_millis(10));
        assert_eq!(*log.borrow(), ["early", "tie", "late"]);
        assert_eq!(dom.now(), Duration::from_millis(30));
    }

    #[test]
    fn cleared_timer_never_fires() {
        let mut dom = MemoryDom::new();
        let fired = Rc::new(RefCell::new(false));
        let flag = Rc::clone(&fired);
        let id = dom.set_timeout(
            Duration::from_millis(5),
            Box::new(move |_| *flag.borrow_mut() = true),
        );
        assert!(dom.clear_timeout(id));
        assert!(!dom.clear_timeout(id));
        dom.advance(Duration::from_secs(1));
        assert!(!*fired.borrow());
    }

    #[test]
    fn scroll_overflow_reports_scrollbar() {
        let mut dom = MemoryDom::with_profile(HostProfile::modern().scrollbar_width(17.0));
        let node = dom.create_element("div");
        dom.set_style(node, "width", "100px");
        assert_eq!(dom.offset_width(node) - dom.client_width(node), 0.0);
        dom.set_style(node, "overflow", "scroll");
        assert_eq!(dom.offset_width(node) - dom.client_width(node), 17.0);
    }

    #[test]
    fn tab_walks_focusables_in_document_order() {
        let mut dom = MemoryDom::new();
        let nodes = dom.append_markup(
            "<a href=\"#a\">a</a><button disabled>x</button><input><span tabindex=\"0\">s</span>",
        );
        dom.focus(nodes[0]);
        dom.press_key(KeyCode::Tab, Modifiers::empty());
        assert_eq!(dom.active_element(), Some(nodes[2]));
        dom.press_key(KeyCode::Tab, Modifiers::empty());
        assert_eq!(dom.active_element(), Some(nodes[3]));
        dom.press_key(KeyCode::Tab, Modifiers::SHIFT);
        assert_eq!(dom.active_element(), Some(nodes[2]));
    }

    #[test]
    fn detaching_focused_subtree_clears_focus() {
        let mut dom = MemoryDom::new();
        let nodes = dom.append_markup("<div><button>b</button></div>");
        let button = dom.children(nodes[0])[0];
        dom.focus(button);
        let body = dom.body();
        assert!(dom.remove_child(body, nodes[0]));
        assert_eq!(dom.active_element(), None);
        assert!(!dom.is_attached(button));
    }

    #[test]
    fn focus_ignores_detached_nodes() {
        let mut dom = MemoryDom::new();
        let loose = dom.create_element("button");
        dom.focus(loose);
        assert_eq!(dom.active_element(), None);
    }

    #[test]
    fn legacy_profile_lacks_transitions_and_flexbox() {
        let dom = MemoryDom::with_profile(HostProfile::legacy());
        assert!(!dom.supports_style_property("transition"));
        assert!(!dom.supports_style_property("flex-wrap"));
        assert!(dom.supports_style_property("overflow"));
    }
}
