#![forbid(unsafe_code)]

//! Native scrollbar width measurement.
//!
//! The measurement inserts an off-screen element with forced overflow and
//! compares its outer and inner widths. [`ProbeNode`] owns that element for
//! the duration of the measurement and detaches it on drop, so the document
//! never keeps the probe, whichever way the measurement exits.

use hey_core::{Dom, NodeId};

const PROBE_SIZE: &str = "100px";

/// Scoped off-screen probe element. Detached from the body when dropped.
pub struct ProbeNode<'a> {
    dom: &'a mut dyn Dom,
    node: NodeId,
    parent: NodeId,
}

impl<'a> ProbeNode<'a> {
    /// Create the probe and attach it to the body.
    pub fn attach(dom: &'a mut dyn Dom) -> Self {
        let node = dom.create_element("div");
        for (property, value) in [
            ("width", PROBE_SIZE),
            ("height", PROBE_SIZE),
            ("overflow", "scroll"),
            ("position", "absolute"),
            ("top", "-9999px"),
        ] {
            dom.set_style(node, property, value);
        }
        let parent = dom.body();
        dom.append_child(parent, node);
        Self { dom, node, parent }
    }

    #[inline]
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Outer width minus inner width, never negative.
    pub fn scrollbar_width(&self) -> f64 {
        let width = self.dom.offset_width(self.node) - self.dom.client_width(self.node);
        if width.is_finite() { width.max(0.0) } else { 0.0 }
    }
}

impl Drop for ProbeNode<'_> {
    fn drop(&mut self) {
        self.dom.remove_child(self.parent, self.node);
    }
}

/// Measure the width of a native scrollbar.
///
/// Uncached; callers normally go through
/// [`Environment::scrollbar_width`](crate::Environment::scrollbar_width).
pub fn measure_scrollbar_width(dom: &mut dyn Dom) -> f64 {
    let probe = ProbeNode::attach(dom);
    let width = probe.scrollbar_width();
    tracing::debug!(width, "measured scrollbar width");
    width
}

#[cfg(test)]
mod tests {
    use super::*;
    use hey_core::{HostProfile, MemoryDom};

    #[test]
    fn measures_profile_scrollbar() {
        let mut dom = MemoryDom::with_profile(HostProfile::modern().scrollbar_width(17.0));
        assert_eq!(measure_scrollbar_width(&mut dom), 17.0);
    }

    #[test]
    fn overlay_scrollbars_measure_zero() {
        let mut dom = MemoryDom::with_profile(HostProfile::modern().scrollbar_width(0.0));
        assert_eq!(measure_scrollbar_width(&mut dom), 0.0);
    }

    #[test]
    fn probe_is_detached_after_measuring() {
        let mut dom = MemoryDom::new();
        let body = dom.body();
        for _ in 0..3 {
            measure_scrollbar_width(&mut dom);
        }
        assert!(dom.children(body).is_empty());
    }

    #[test]
    fn probe_is_detached_on_unwind() {
        let mut dom = MemoryDom::new();
        let body = dom.body();
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let probe = ProbeNode::attach(&mut dom);
            assert!(probe.scrollbar_width() > 0.0);
            panic!("measurement failed");
        }));
        assert!(outcome.is_err());
        assert!(dom.children(body).is_empty());
    }

    #[test]
    fn probe_forces_overflow() {
        let mut dom = MemoryDom::new();
        let body = dom.body();
        let probe = ProbeNode::attach(&mut dom);
        let node = probe.node();
        drop(probe);
        assert!(!dom.children(body).contains(&node));
        assert_eq!(dom.style(node, "overflow").as_deref(), Some("scroll"));
    }
}
