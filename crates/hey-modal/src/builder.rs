#![forbid(unsafe_code)]

//! Dialog skeleton construction.
//!
//! ```text
//! wrapper            [aria-hidden]
//! └── dialog         [role=dialog, aria-labelledby=modal__title-<id>]
//!     ├── header
//!     │   ├── title  h3#modal__title-<id>
//!     │   └── close  button[type=button][aria-label]
//!     └── inner      overflow: auto
//!         ├── content
//!         └── confirm             (confirm variant only)
//!             ├── accept  a[href = trigger href]
//!             └── cancel  button[data-hey-close]
//! ```
//!
//! [`build`] creates the tree detached; [`ModalNodes::mount`] appends it to
//! the document body.

use hey_core::{Dom, NodeId};

use crate::config::{ClassConfig, ClassRole, Labels};
use crate::factory::ModalId;

/// Attribute marking a descendant that closes the modal when clicked.
pub const USER_CLOSE_MARKER: &str = "data-hey-close";

/// Accessibility label id of the title for modal `id`.
pub fn title_id(id: ModalId) -> String {
    format!("modal__title-{id}")
}

/// Accept/cancel controls of a confirm dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmNodes {
    pub container: NodeId,
    pub accept: NodeId,
    pub cancel: NodeId,
}

/// Every node a modal owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModalNodes {
    pub wrapper: NodeId,
    pub dialog: NodeId,
    pub header: NodeId,
    pub title: NodeId,
    pub close_button: NodeId,
    /// Scrollable container; receives the max-height correction.
    pub inner: NodeId,
    /// Receives the body content.
    pub content: NodeId,
    pub confirm: Option<ConfirmNodes>,
}

impl ModalNodes {
    /// Append the wrapper to the document body.
    pub fn mount(&self, dom: &mut dyn Dom) {
        let body = dom.body();
        dom.append_child(body, self.wrapper);
    }
}

/// Create the detached dialog tree.
pub fn build(
    dom: &mut dyn Dom,
    classes: &ClassConfig,
    labels: &Labels,
    id: ModalId,
    trigger: Option<NodeId>,
    confirm: bool,
) -> ModalNodes {
    let title_id = title_id(id);

    let wrapper = element(dom, "div", classes.get(ClassRole::Wrapper));
    dom.set_attribute(wrapper, "aria-hidden", "true");

    let dialog = element(dom, "div", classes.get(ClassRole::Dialog));
    dom.set_attribute(dialog, "role", "dialog");
    dom.set_attribute(dialog, "aria-labelledby", &title_id);

    let header = element(dom, "div", classes.get(ClassRole::Header));

    let title = element(dom, "h3", classes.get(ClassRole::Title));
    dom.set_attribute(title, "id", &title_id);

    let inner = element(dom, "div", classes.get(ClassRole::Body));
    dom.set_style(inner, "overflow", "auto");

    let content = element(dom, "div", classes.get(ClassRole::Content));
    dom.append_child(inner, content);

    let close_button = element(dom, "button", classes.get(ClassRole::CloseButton));
    dom.set_attribute(close_button, "type", "button");
    dom.set_attribute(close_button, "aria-label", &labels.close);

    let confirm = confirm.then(|| {
        let container = element(dom, "div", classes.get(ClassRole::ConfirmContainer));

        let accept = element(dom, "a", classes.get(ClassRole::ConfirmAccept));
        dom.set_inner_html(accept, &labels.accept);
        if let Some(href) = trigger.and_then(|t| dom.attribute(t, "href")) {
            dom.set_attribute(accept, "href", &href);
        }

        let cancel = element(dom, "button", classes.get(ClassRole::ConfirmCancel));
        dom.set_inner_html(cancel, &labels.cancel);
        dom.set_attribute(cancel, USER_CLOSE_MARKER, "");

        dom.append_child(container, accept);
        dom.append_child(container, cancel);
        dom.append_child(inner, container);
        ConfirmNodes {
            container,
            accept,
            cancel,
        }
    });

    dom.append_child(header, title);
    dom.append_child(header, close_button);
    dom.append_child(dialog, header);
    dom.append_child(dialog, inner);
    dom.append_child(wrapper, dialog);

    tracing::debug!(modal_id = %id, confirm = confirm.is_some(), "built modal tree");
    ModalNodes {
        wrapper,
        dialog,
        header,
        title,
        close_button,
        inner,
        content,
        confirm,
    }
}

fn element(dom: &mut dyn Dom, tag: &str, classes: &[String]) -> NodeId {
    let node = dom.create_element(tag);
    for class in classes {
        dom.add_class(node, class);
    }
    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use hey_core::MemoryDom;
    use pretty_assertions::assert_eq;

    fn id(raw: u64) -> ModalId {
        ModalId::from_raw(raw)
    }

    #[test]
    fn builds_expected_structure() {
        let mut dom = MemoryDom::new();
        let nodes = build(&mut dom, &ClassConfig::default(), &Labels::default(), id(4), None, false);

        assert_eq!(dom.children(nodes.wrapper), vec![nodes.dialog]);
        assert_eq!(dom.children(nodes.dialog), vec![nodes.header, nodes.inner]);
        assert_eq!(dom.children(nodes.header), vec![nodes.title, nodes.close_button]);
        assert_eq!(dom.children(nodes.inner), vec![nodes.content]);
        assert_eq!(nodes.confirm, None);

        assert_eq!(dom.tag(nodes.title), "h3");
        assert_eq!(dom.attribute(nodes.title, "id").as_deref(), Some("modal__title-4"));
        assert_eq!(
            dom.attribute(nodes.dialog, "aria-labelledby").as_deref(),
            Some("modal__title-4")
        );
        assert_eq!(dom.attribute(nodes.dialog, "role").as_deref(), Some("dialog"));
        assert_eq!(dom.attribute(nodes.wrapper, "aria-hidden").as_deref(), Some("true"));
        assert_eq!(dom.attribute(nodes.close_button, "type").as_deref(), Some("button"));
        assert_eq!(dom.attribute(nodes.close_button, "aria-label").as_deref(), Some("Close"));
        assert_eq!(dom.style(nodes.inner, "overflow").as_deref(), Some("auto"));
        assert!(dom.has_class(nodes.content, "modal__content"));
        assert!(dom.has_class(nodes.inner, "modal__body"));
    }

    #[test]
    fn build_does_not_mount() {
        let mut dom = MemoryDom::new();
        let nodes = build(&mut dom, &ClassConfig::default(), &Labels::default(), id(1), None, false);
        assert!(!dom.is_attached(nodes.wrapper));
        nodes.mount(&mut dom);
        assert_eq!(dom.parent(nodes.wrapper), Some(dom.body()));
    }

    #[test]
    fn confirm_variant_adds_actions() {
        let mut dom = MemoryDom::new();
        let trigger = dom.append_markup(r#"<a href="/delete/7" data-hey-confirm>Delete</a>"#)[0];
        let nodes = build(
            &mut dom,
            &ClassConfig::default(),
            &Labels::default(),
            id(2),
            Some(trigger),
            true,
        );
        let confirm = nodes.confirm.unwrap();
        assert_eq!(dom.children(nodes.inner), vec![nodes.content, confirm.container]);
        assert_eq!(dom.tag(confirm.accept), "a");
        assert_eq!(dom.attribute(confirm.accept, "href").as_deref(), Some("/delete/7"));
        assert_eq!(dom.inner_html(confirm.accept), "Proceed");
        assert!(dom.has_class(confirm.accept, "btn--positive"));
        assert_eq!(dom.tag(confirm.cancel), "button");
        assert!(dom.has_attribute(confirm.cancel, USER_CLOSE_MARKER));
        assert_eq!(dom.inner_html(confirm.cancel), "Cancel");
    }

    #[test]
    fn configured_classes_and_labels_apply() {
        let mut dom = MemoryDom::new();
        let mut classes = ClassConfig::default();
        classes.set(ClassRole::Wrapper, ["overlay", "overlay--dark"]);
        classes.set(ClassRole::Dialog, Vec::<String>::new());
        let labels = Labels {
            close: "Schließen".into(),
            ..Labels::default()
        };
        let nodes = build(&mut dom, &classes, &labels, id(3), None, false);
        assert_eq!(
            dom.attribute(nodes.wrapper, "class").as_deref(),
            Some("overlay overlay--dark")
        );
        assert!(!dom.has_class(nodes.dialog, "modal__dialog"));
        assert_eq!(
            dom.attribute(nodes.close_button, "aria-label").as_deref(),
            Some("Schließen")
        );
    }
}
