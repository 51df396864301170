#![forbid(unsafe_code)]

//! Max-height correction for hosts without flex layout.
//!
//! With flexbox the scrollable body simply fills the space left under the
//! header. Without it, the body gets an explicit `max-height`:
//!
//! ```text
//! max-height = wrapper height − 2 × wrapper padding-top − header height
//! ```
//!
//! clamped at zero and recomputed, debounced, on every window resize.

use std::rc::Rc;
use std::time::Duration;

use hey_core::{Dom, Event, EventKind, EventTarget, ListenerId, NodeId};
use hey_runtime::Debounce;

use crate::builder::ModalNodes;

/// Trailing delay before the max-height is recomputed after a resize.
pub const MAX_HEIGHT_DEBOUNCE: Duration = Duration::from_millis(200);

/// Recomputes the scrollable body's max-height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutCorrector {
    wrapper: NodeId,
    header: NodeId,
    inner: NodeId,
}

impl LayoutCorrector {
    pub fn new(nodes: &ModalNodes) -> Self {
        Self {
            wrapper: nodes.wrapper,
            header: nodes.header,
            inner: nodes.inner,
        }
    }

    /// The max-height the scrollable body should have, in px.
    pub fn max_height(&self, dom: &dyn Dom) -> f64 {
        let padding = dom
            .computed_style(self.wrapper, "padding-top")
            .and_then(|value| parse_px(&value))
            .unwrap_or(0.0);
        let height = dom.offset_height(self.wrapper) - 2.0 * padding - dom.offset_height(self.header);
        height.max(0.0)
    }

    /// Compute and write the max-height. Returns the value written.
    pub fn apply(&self, dom: &mut dyn Dom) -> f64 {
        let height = self.max_height(dom);
        dom.set_style(self.inner, "max-height", &format!("{height}px"));
        tracing::trace!(inner = %self.inner, height, "corrected max-height");
        height
    }

    /// Reapply on window resize, debounced. Returns the listener id.
    pub fn track_resize(self, dom: &mut dyn Dom) -> ListenerId {
        let refresh = Debounce::new(MAX_HEIGHT_DEBOUNCE, move |dom: &mut dyn Dom| {
            self.apply(dom);
        });
        dom.add_event_listener(
            EventTarget::Window,
            EventKind::Resize,
            Rc::new(move |dom: &mut dyn Dom, _: &mut Event| refresh.call(dom)),
        )
    }
}

fn parse_px(value: &str) -> Option<f64> {
    value.trim().trim_end_matches("px").trim().parse().ok()
}
