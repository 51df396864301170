#![forbid(unsafe_code)]

//! Environment capabilities and page metrics shared by every modal.
//!
//! An [`Environment`] is created once per document and handed to each
//! modal by the factory. Capabilities and the scrollbar width are computed
//! on first use and never again; page scrollability is refreshed by a
//! debounced window-resize listener registered once per environment.
//!
//! # Invariants
//!
//! 1. [`Environment::capabilities`] probes the host at most once.
//! 2. [`Environment::scrollbar_width`] measures at most once, even when the
//!    measurement is `0` (overlay scrollbars).
//! 3. At most one resize listener is registered per environment.
//!
//! Tests inject fixed values with [`Environment::with_capabilities`] and
//! [`Environment::with_scrollbar_width`].

use std::cell::{Cell, OnceCell};
use std::rc::Rc;
use std::time::Duration;

use hey_core::{Dom, Event, EventKind, EventTarget, ListenerId};
use hey_runtime::Debounce;

use crate::metrics::measure_scrollbar_width;

/// Trailing delay before page scrollability is recomputed after a resize.
pub const PAGE_SCROLL_DEBOUNCE: Duration = Duration::from_millis(500);

thread_local! {
    static SHARED: Rc<Environment> = Rc::new(Environment::new());
}

/// Style features the modal adapts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvironmentCapabilities {
    /// CSS transitions are available, so show/hide completes asynchronously.
    pub supports_transitions: bool,
    /// Flex layout is available, so the body needs no explicit max-height.
    pub supports_flexbox: bool,
}

impl EnvironmentCapabilities {
    pub const fn new(supports_transitions: bool, supports_flexbox: bool) -> Self {
        Self {
            supports_transitions,
            supports_flexbox,
        }
    }

    /// Ask the host's style engine which features it recognises.
    pub fn probe(dom: &dyn Dom) -> Self {
        let caps = Self {
            supports_transitions: dom.supports_style_property("transition")
                || dom.supports_style_property("-webkit-transition"),
            supports_flexbox: dom.supports_style_property("flex-wrap"),
        };
        tracing::debug!(
            transitions = caps.supports_transitions,
            flexbox = caps.supports_flexbox,
            "probed environment"
        );
        caps
    }
}

/// Snapshot of everything the environment knows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SharedEnvironmentState {
    pub supports_transitions: bool,
    pub supports_flexbox: bool,
    pub is_page_scrollable: bool,
    /// `None` until the first measurement.
    pub scrollbar_width: Option<f64>,
}

/// Lazily initialised capability and metric cache.
#[derive(Debug, Default)]
pub struct Environment {
    capabilities: OnceCell<EnvironmentCapabilities>,
    scrollbar_width: OnceCell<f64>,
    page_scrollable: Rc<Cell<bool>>,
    resize_listener: Cell<Option<ListenerId>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// The per-thread environment used by [`ModalFactory::new`](crate::ModalFactory::new).
    pub fn shared() -> Rc<Self> {
        SHARED.with(Rc::clone)
    }

    /// Skip probing and use `capabilities`.
    #[must_use]
    pub fn with_capabilities(self, capabilities: EnvironmentCapabilities) -> Self {
        let cell = OnceCell::new();
        let _ = cell.set(capabilities);
        Self {
            capabilities: cell,
            ..self
        }
    }

    /// Skip measuring and use `width`.
    #[must_use]
    pub fn with_scrollbar_width(self, width: f64) -> Self {
        let cell = OnceCell::new();
        let _ = cell.set(width);
        Self {
            scrollbar_width: cell,
            ..self
        }
    }

    /// Probed on first call, cached afterwards.
    pub fn capabilities(&self, dom: &dyn Dom) -> EnvironmentCapabilities {
        *self
            .capabilities
            .get_or_init(|| EnvironmentCapabilities::probe(dom))
    }

    /// Measured on first call, cached afterwards.
    pub fn scrollbar_width(&self, dom: &mut dyn Dom) -> f64 {
        *self
            .scrollbar_width
            .get_or_init(|| measure_scrollbar_width(dom))
    }

    /// Recompute whether the page content overflows the viewport.
    pub fn refresh_page_scrollable(&self, dom: &dyn Dom) -> bool {
        let scrollable = page_is_scrollable(dom);
        self.page_scrollable.set(scrollable);
        scrollable
    }

    /// Last computed page scrollability.
    #[inline]
    pub fn is_page_scrollable(&self) -> bool {
        self.page_scrollable.get()
    }

    /// Whether [`Environment::track_resize`] has registered its listener.
    #[inline]
    pub fn is_tracking_resize(&self) -> bool {
        self.resize_listener.get().is_some()
    }

    /// Keep page scrollability current across window resizes.
    ///
    /// Registers one debounced listener; later calls are no-ops.
    pub fn track_resize(&self, dom: &mut dyn Dom) {
        if self.is_tracking_resize() {
            return;
        }
        let scrollable = Rc::clone(&self.page_scrollable);
        let refresh = Debounce::new(PAGE_SCROLL_DEBOUNCE, move |dom: &mut dyn Dom| {
            let value = page_is_scrollable(dom);
            tracing::debug!(scrollable = value, "page scrollability refreshed");
            scrollable.set(value);
        });
        let id = dom.add_event_listener(
            EventTarget::Window,
            EventKind::Resize,
            Rc::new(move |dom: &mut dyn Dom, _: &mut Event| refresh.call(dom)),
        );
        self.resize_listener.set(Some(id));
    }

    pub fn state(&self) -> SharedEnvironmentState {
        let caps = self.capabilities.get().copied();
        SharedEnvironmentState {
            supports_transitions: caps.is_some_and(|c| c.supports_transitions),
            supports_flexbox: caps.is_some_and(|c| c.supports_flexbox),
            is_page_scrollable: self.page_scrollable.get(),
            scrollbar_width: self.scrollbar_width.get().copied(),
        }
    }
}

fn page_is_scrollable(dom: &dyn Dom) -> bool {
    dom.offset_height(dom.body()) > dom.viewport_height()
}
