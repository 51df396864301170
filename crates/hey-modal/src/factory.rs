#![forbid(unsafe_code)]

//! Per-trigger modal construction and the handle it returns.
//!
//! [`ModalFactory::create`] runs the whole setup synchronously, in order:
//!
//! 1. probe capabilities, refresh page scrollability, measure the scrollbar
//!    and register the shared resize tracking (all cached per environment)
//! 2. merge and validate the configuration
//! 3. allocate an id, detect the confirm variant, resolve the target
//! 4. build the tree, populate content, mount it, detach the target
//! 5. correct the body's max-height when flexbox is missing
//! 6. wire trigger, close controls, keyboard and touch handling
//!
//! Recoverable problems are logged and kept in
//! [`ModalHandle::diagnostics`]; construction always yields a handle.

use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use hey_core::{Dom, Event, EventKind, EventTarget, Listener, ListenerId, NodeId};

use crate::builder::{self, ModalNodes, USER_CLOSE_MARKER};
use crate::config::ModalConfig;
use crate::content::{Content, resolve_target};
use crate::environment::Environment;
use crate::error::ModalError;
use crate::layout::LayoutCorrector;
use crate::lifecycle::{FocusTrap, Lifecycle, Visibility};

/// Trigger attribute selecting the confirm variant.
pub const CONFIRM_ATTRIBUTE: &str = "data-hey-confirm";

static MODAL_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique, monotonically assigned modal identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModalId(u64);

impl ModalId {
    fn next() -> Self {
        Self(MODAL_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ModalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Creates modals against one [`Environment`].
#[derive(Debug, Clone)]
pub struct ModalFactory {
    env: Rc<Environment>,
}

impl Default for ModalFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ModalFactory {
    /// Factory using the thread's shared environment.
    pub fn new() -> Self {
        Self::with_environment(Environment::shared())
    }

    pub fn with_environment(env: Rc<Environment>) -> Self {
        Self { env }
    }

    #[inline]
    pub fn environment(&self) -> &Rc<Environment> {
        &self.env
    }

    /// Build a modal for `trigger` and wire it into the document.
    pub fn create(
        &self,
        dom: &mut dyn Dom,
        trigger: NodeId,
        config: Option<&ModalConfig>,
    ) -> ModalHandle {
        let env = &self.env;
        let capabilities = env.capabilities(dom);
        env.refresh_page_scrollable(dom);
        env.scrollbar_width(dom);
        env.track_resize(dom);

        let (options, mut diagnostics) = config.map(ModalConfig::resolve).unwrap_or_default();
        let id = ModalId::next();
        let confirm = dom.has_attribute(trigger, CONFIRM_ATTRIBUTE);

        let target = if confirm {
            None
        } else {
            match resolve_target(dom, trigger) {
                Ok(node) => Some(node),
                Err(err) => {
                    diagnostics.push(err);
                    None
                }
            }
        };
        for err in &diagnostics {
            log_diagnostic(id, err);
        }

        let nodes = builder::build(dom, &options.classes, &options.labels, id, Some(trigger), confirm);
        let content = Content::resolve(
            dom,
            options.title.as_deref(),
            options.body.as_deref(),
            target,
            trigger,
        );
        content.populate(dom, nodes.title, nodes.content);
        nodes.mount(dom);

        if let Some(target) = target {
            if let Some(parent) = dom.parent(target) {
                dom.remove_child(parent, target);
            }
        }

        let mut listeners = Vec::new();
        if !capabilities.supports_flexbox {
            let corrector = LayoutCorrector::new(&nodes);
            corrector.apply(dom);
            listeners.push(corrector.track_resize(dom));
        }

        let lifecycle = Lifecycle::new(id, nodes, &options.classes, Rc::clone(env), capabilities);
        listeners.extend(bind_events(dom, &lifecycle, &nodes, trigger));

        tracing::debug!(
            modal_id = %id,
            confirm,
            target = ?target,
            diagnostics = diagnostics.len(),
            "modal created"
        );
        ModalHandle {
            id,
            trigger,
            confirm,
            target,
            content,
            nodes,
            diagnostics,
            lifecycle,
            listeners,
        }
    }
}

/// Build a modal with the thread's shared environment.
pub fn create(dom: &mut dyn Dom, trigger: NodeId, config: Option<&ModalConfig>) -> ModalHandle {
    ModalFactory::new().create(dom, trigger, config)
}

fn log_diagnostic(id: ModalId, err: &ModalError) {
    match err {
        ModalError::Configuration { role, .. } => {
            tracing::error!(modal_id = %id, role = %role, "{err}");
        }
        ModalError::MissingTarget { selector } => {
            tracing::error!(modal_id = %id, selector = ?selector, "{err}");
        }
        ModalError::InvalidSelector(inner) => {
            tracing::error!(modal_id = %id, selector = %inner.input, "{err}");
        }
    }
}

fn bind_events(
    dom: &mut dyn Dom,
    lifecycle: &Lifecycle,
    nodes: &ModalNodes,
    trigger: NodeId,
) -> Vec<ListenerId> {
    let mut ids = Vec::new();
    let mut listen = |dom: &mut dyn Dom,
                      node: NodeId,
                      kind: EventKind,
                      listener: Listener| {
        ids.push(dom.add_event_listener(EventTarget::Node(node), kind, listener));
    };

    // Background must not scroll under a touch drag; the content may.
    listen(
        dom,
        nodes.wrapper,
        EventKind::TouchMove,
        Rc::new(|_: &mut dyn Dom, event: &mut Event| event.prevent_default()),
    );
    listen(
        dom,
        nodes.content,
        EventKind::TouchMove,
        Rc::new(|_: &mut dyn Dom, event: &mut Event| event.stop_propagation()),
    );

    let modal = lifecycle.clone();
    listen(
        dom,
        trigger,
        EventKind::Click,
        Rc::new(move |dom: &mut dyn Dom, event: &mut Event| {
            event.prevent_default();
            modal.open(dom);
        }),
    );

    for node in [nodes.wrapper, nodes.close_button] {
        let modal = lifecycle.clone();
        listen(
            dom,
            node,
            EventKind::Click,
            Rc::new(move |dom: &mut dyn Dom, _: &mut Event| modal.close(dom)),
        );
    }

    // Clicks inside the dialog never reach the backdrop handler.
    listen(
        dom,
        nodes.dialog,
        EventKind::Click,
        Rc::new(|_: &mut dyn Dom, event: &mut Event| event.stop_propagation()),
    );

    let user_close = dom
        .query_selector_all(Some(nodes.dialog), &format!("[{USER_CLOSE_MARKER}]"))
        .unwrap_or_default();
    for node in user_close {
        let modal = lifecycle.clone();
        listen(
            dom,
            node,
            EventKind::Click,
            Rc::new(move |dom: &mut dyn Dom, event: &mut Event| {
                event.prevent_default();
                modal.close(dom);
            }),
        );
    }

    let modal = lifecycle.clone();
    listen(
        dom,
        nodes.wrapper,
        EventKind::KeyDown,
        Rc::new(move |dom: &mut dyn Dom, event: &mut Event| modal.handle_key(dom, event)),
    );
    ids
}

/// A constructed modal.
///
/// Dropping the handle does not tear the modal down; the registered
/// listeners keep it alive and working.
#[derive(Debug)]
pub struct ModalHandle {
    id: ModalId,
    trigger: NodeId,
    confirm: bool,
    target: Option<NodeId>,
    content: Content,
    nodes: ModalNodes,
    diagnostics: Vec<ModalError>,
    lifecycle: Lifecycle,
    listeners: Vec<ListenerId>,
}

impl ModalHandle {
    pub fn open(&self, dom: &mut dyn Dom) {
        self.lifecycle.open(dom);
    }

    pub fn close(&self, dom: &mut dyn Dom) {
        self.lifecycle.close(dom);
    }

    /// Subscribe to events on the wrapper, e.g. [`OPENED_EVENT`](crate::OPENED_EVENT).
    pub fn on(
        &self,
        dom: &mut dyn Dom,
        kind: EventKind,
        listener: impl Fn(&mut dyn Dom, &mut Event) + 'static,
    ) -> ListenerId {
        dom.add_event_listener(EventTarget::Node(self.nodes.wrapper), kind, Rc::new(listener))
    }

    pub fn off(&self, dom: &mut dyn Dom, id: ListenerId) -> bool {
        dom.remove_event_listener(id)
    }

    #[inline]
    pub fn id(&self) -> ModalId {
        self.id
    }

    #[inline]
    pub fn state(&self) -> Visibility {
        self.lifecycle.state()
    }

    #[inline]
    pub fn focus_trap(&self) -> FocusTrap {
        self.lifecycle.focus_trap()
    }

    #[inline]
    pub fn is_confirm(&self) -> bool {
        self.confirm
    }

    #[inline]
    pub fn trigger(&self) -> NodeId {
        self.trigger
    }

    /// The subtree the content was taken from. Detached from the document.
    #[inline]
    pub fn target(&self) -> Option<NodeId> {
        self.target
    }

    #[inline]
    pub fn content(&self) -> &Content {
        &self.content
    }

    #[inline]
    pub fn nodes(&self) -> &ModalNodes {
        &self.nodes
    }

    /// Recoverable errors met during construction.
    #[inline]
    pub fn diagnostics(&self) -> &[ModalError] {
        &self.diagnostics
    }

    /// Listeners the modal registered on the document.
    #[inline]
    pub fn listeners(&self) -> &[ListenerId] {
        &self.listeners
    }
}
