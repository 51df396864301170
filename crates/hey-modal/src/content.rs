#![forbid(unsafe_code)]

//! Content resolution: which markup ends up in the title and body.
//!
//! Each slot is resolved independently, first hit wins:
//!
//! | Priority | Source | Read as |
//! |----------|--------|---------|
//! | 1 | Explicit configuration | verbatim |
//! | 2 | Descendant of the target carrying `data-hey-<slot>` | inner markup |
//! | 3 | `data-hey-<slot>` attribute on the target itself | attribute value |
//! | 4 | `data-hey-<slot>` attribute on the trigger | attribute value |
//! | 5 | nothing | absent |
//!
//! Empty values never win; they fall through to the next source.
//!
//! The target itself is found from the trigger: `data-hey` holds an explicit
//! selector, otherwise the fragment of `href` (`page.html#panel` → `#panel`)
//! is used. Confirm triggers never have a target.

use hey_core::{Dom, NodeId};

use crate::error::ModalError;

/// Trigger attribute naming the target selector.
pub const TARGET_ATTRIBUTE: &str = "data-hey";

/// A content slot of the dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentSlot {
    Title,
    Body,
}

impl ContentSlot {
    pub const ALL: [ContentSlot; 2] = [Self::Title, Self::Body];

    /// Attribute marking this slot on target descendants and triggers.
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Title => "data-hey-title",
            Self::Body => "data-hey-body",
        }
    }
}

/// Where a slot's value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentSource {
    Explicit,
    Target,
    Trigger,
    Empty,
}

/// A resolved slot value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotContent {
    pub value: Option<String>,
    pub source: ContentSource,
}

impl SlotContent {
    fn new(value: String, source: ContentSource) -> Self {
        Self {
            value: Some(value),
            source,
        }
    }

    const EMPTY: Self = Self {
        value: None,
        source: ContentSource::Empty,
    };
}

/// Resolved title and body, fixed at build time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content {
    pub title: SlotContent,
    pub body: SlotContent,
}

impl Content {
    /// Resolve both slots.
    pub fn resolve(
        dom: &dyn Dom,
        explicit_title: Option<&str>,
        explicit_body: Option<&str>,
        target: Option<NodeId>,
        trigger: NodeId,
    ) -> Self {
        Self {
            title: resolve_slot(dom, ContentSlot::Title, explicit_title, target, trigger),
            body: resolve_slot(dom, ContentSlot::Body, explicit_body, target, trigger),
        }
    }

    pub fn slot(&self, slot: ContentSlot) -> &SlotContent {
        match slot {
            ContentSlot::Title => &self.title,
            ContentSlot::Body => &self.body,
        }
    }

    #[inline]
    pub fn get(&self, slot: ContentSlot) -> Option<&str> {
        self.slot(slot).value.as_deref()
    }

    /// Write both slots into their dialog nodes. Absent slots are left empty.
    pub fn populate(&self, dom: &mut dyn Dom, title_node: NodeId, body_node: NodeId) {
        for (slot, node) in [(ContentSlot::Title, title_node), (ContentSlot::Body, body_node)] {
            dom.set_inner_html(node, self.get(slot).unwrap_or_default());
        }
    }
}

/// Resolve one slot by priority.
pub fn resolve_slot(
    dom: &dyn Dom,
    slot: ContentSlot,
    explicit: Option<&str>,
    target: Option<NodeId>,
    trigger: NodeId,
) -> SlotContent {
    if let Some(value) = explicit.filter(|v| !v.is_empty()) {
        return SlotContent::new(value.to_owned(), ContentSource::Explicit);
    }
    let marker = format!("[{}]", slot.marker());
    let from_target = target
        .and_then(|target| dom.query_selector(Some(target), &marker).ok().flatten())
        .map(|node| dom.inner_html(node))
        .filter(|markup| !markup.is_empty());
    if let Some(markup) = from_target {
        return SlotContent::new(markup, ContentSource::Target);
    }
    let on_target = target
        .and_then(|target| dom.attribute(target, slot.marker()))
        .filter(|value| !value.is_empty());
    if let Some(value) = on_target {
        return SlotContent::new(value, ContentSource::Target);
    }
    match dom.attribute(trigger, slot.marker()) {
        Some(value) if !value.is_empty() => SlotContent::new(value, ContentSource::Trigger),
        _ => SlotContent::EMPTY,
    }
}

/// Selector naming the trigger's target, if it names one.
pub fn target_selector(dom: &dyn Dom, trigger: NodeId) -> Option<String> {
    if let Some(selector) = dom.attribute(trigger, TARGET_ATTRIBUTE) {
        let selector = selector.trim();
        if !selector.is_empty() {
            return Some(selector.to_owned());
        }
    }
    let href = dom.attribute(trigger, "href")?;
    let fragment = &href[href.find('#')?..];
    (fragment.len() > 1).then(|| fragment.to_owned())
}

/// Find the target subtree for a non-confirm trigger.
pub fn resolve_target(dom: &dyn Dom, trigger: NodeId) -> Result<NodeId, ModalError> {
    let Some(selector) = target_selector(dom, trigger) else {
        return Err(ModalError::MissingTarget { selector: None });
    };
    match dom.query_selector(None, &selector)? {
        Some(node) => Ok(node),
        None => Err(ModalError::MissingTarget {
            selector: Some(selector),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hey_core::MemoryDom;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn trigger(dom: &mut MemoryDom, markup: &str) -> NodeId {
        dom.append_markup(markup)[0]
    }

    #[test]
    fn href_fragment_names_target() {
        let mut dom = MemoryDom::new();
        let panel = dom.append_markup(r#"<div id="panel-1"></div>"#)[0];
        let t = trigger(&mut dom, r##"<a href="/docs#panel-1">open</a>"##);
        assert_eq!(target_selector(&dom, t).as_deref(), Some("#panel-1"));
        assert_eq!(resolve_target(&dom, t), Ok(panel));
    }

    #[test]
    fn explicit_selector_beats_href() {
        let mut dom = MemoryDom::new();
        let panel = dom.append_markup(r#"<section class="help"></section>"#)[0];
        let t = trigger(&mut dom, r##"<a href="#nope" data-hey=".help">open</a>"##);
        assert_eq!(resolve_target(&dom, t), Ok(panel));
    }

    #[test]
    fn missing_targets() {
        let mut dom = MemoryDom::new();
        let bare = trigger(&mut dom, r#"<a href="/page">x</a>"#);
        assert_eq!(
            resolve_target(&dom, bare),
            Err(ModalError::MissingTarget { selector: None })
        );
        let hash_only = trigger(&mut dom, r##"<a href="#">x</a>"##);
        assert_eq!(target_selector(&dom, hash_only), None);
        let dangling = trigger(&mut dom, r##"<a href="#ghost">x</a>"##);
        assert_eq!(
            resolve_target(&dom, dangling),
            Err(ModalError::MissingTarget {
                selector: Some("#ghost".into())
            })
        );
    }

    #[test]
    fn malformed_selector_is_reported() {
        let mut dom = MemoryDom::new();
        let t = trigger(&mut dom, r#"<a data-hey="a:hover">x</a>"#);
        assert!(matches!(
            resolve_target(&dom, t),
            Err(ModalError::InvalidSelector(_))
        ));
    }

    #[test]
    fn target_markers_are_read_as_markup() {
        let mut dom = MemoryDom::new();
        let panel = dom.append_markup(
            r#"<div id="p"><h2 data-hey-title>Hi</h2><div data-hey-body><p>Text</p></div></div>"#,
        )[0];
        let t = trigger(&mut dom, r##"<a href="#p" data-hey-title="Ignored">x</a>"##);
        let content = Content::resolve(&dom, None, None, Some(panel), t);
        assert_eq!(content.get(ContentSlot::Title), Some("Hi"));
        assert_eq!(content.title.source, ContentSource::Target);
        assert_eq!(content.get(ContentSlot::Body), Some("<p>Text</p>"));
    }

    #[test]
    fn target_own_attribute_counts_as_target() {
        let mut dom = MemoryDom::new();
        let panel = dom.append_markup(r#"<div id="panel-1" data-hey-title="Hi"></div>"#)[0];
        let t = trigger(&mut dom, r##"<a href="#panel-1" data-hey-title="Trigger">x</a>"##);
        let content = Content::resolve(&dom, None, None, Some(panel), t);
        assert_eq!(content.get(ContentSlot::Title), Some("Hi"));
        assert_eq!(content.title.source, ContentSource::Target);
        assert_eq!(content.body, SlotContent::EMPTY);
    }

    #[test]
    fn target_descendant_beats_target_attribute() {
        let mut dom = MemoryDom::new();
        let panel = dom
            .append_markup(r#"<div data-hey-title="Outer"><b data-hey-title>Inner</b></div>"#)[0];
        let t = trigger(&mut dom, "<a>x</a>");
        let content = Content::resolve(&dom, None, None, Some(panel), t);
        assert_eq!(content.get(ContentSlot::Title), Some("Inner"));
    }

    #[test]
    fn trigger_attributes_fill_gaps() {
        let mut dom = MemoryDom::new();
        let panel = dom.append_markup(r#"<div id="p"><p data-hey-body>Body</p></div>"#)[0];
        let t = trigger(&mut dom, r#"<a data-hey-title="From trigger">x</a>"#);
        let content = Content::resolve(&dom, None, None, Some(panel), t);
        assert_eq!(content.get(ContentSlot::Title), Some("From trigger"));
        assert_eq!(content.title.source, ContentSource::Trigger);
        assert_eq!(content.body.source, ContentSource::Target);
    }

    #[test]
    fn nothing_resolves_to_empty() {
        let mut dom = MemoryDom::new();
        let t = trigger(&mut dom, "<a>x</a>");
        let content = Content::resolve(&dom, Some(""), None, None, t);
        assert_eq!(content.title, SlotContent::EMPTY);
        assert_eq!(content.body, SlotContent::EMPTY);
    }

    #[test]
    fn populate_writes_nodes() {
        let mut dom = MemoryDom::new();
        let t = trigger(&mut dom, r#"<a data-hey-body="&lt;b&gt;x&lt;/b&gt;">x</a>"#);
        let title = dom.create_element("h3");
        let body = dom.create_element("div");
        dom.set_inner_html(title, "stale");
        let content = Content::resolve(&dom, None, None, None, t);
        content.populate(&mut dom, title, body);
        assert_eq!(dom.inner_html(title), "");
        assert_eq!(dom.inner_html(body), "<b>x</b>");
    }

    proptest! {
        #[test]
        fn higher_priority_source_always_wins(
            explicit in proptest::option::of("[a-z]{1,8}"),
            in_target in proptest::option::of("[a-z]{1,8}"),
            on_trigger in proptest::option::of("[a-z]{1,8}"),
        ) {
            let mut dom = MemoryDom::new();
            let panel = match &in_target {
                Some(v) => dom.append_markup(&format!(r#"<div><span data-hey-title>{v}</span></div>"#))[0],
                None => dom.append_markup("<div></div>")[0],
            };
            let t = match &on_trigger {
                Some(v) => trigger(&mut dom, &format!(r#"<a data-hey-title="{v}">x</a>"#)),
                None => trigger(&mut dom, "<a>x</a>"),
            };
            let slot = resolve_slot(&dom, ContentSlot::Title, explicit.as_deref(), Some(panel), t);
            let (expected, source) = if let Some(v) = explicit {
                (Some(v), ContentSource::Explicit)
            } else if let Some(v) = in_target {
                (Some(v), ContentSource::Target)
            } else if let Some(v) = on_trigger {
                (Some(v), ContentSource::Trigger)
            } else {
                (None, ContentSource::Empty)
            };
            prop_assert_eq!(slot.value, expected);
            prop_assert_eq!(slot.source, source);
        }
    }
}
