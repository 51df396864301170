#![forbid(unsafe_code)]

//! Accessible overlay dialogs over a host [`Dom`](hey_core::Dom).
//!
//! A modal is created per trigger element. Construction reads the trigger,
//! resolves title and body content (from configuration, a target subtree
//! named by the trigger, or the trigger's own `data-hey-*` attributes),
//! builds the dialog tree at the end of the document body and wires it up.
//! At runtime the modal owns a small state machine that toggles visibility,
//! locks page scroll, traps keyboard focus and waits for CSS transitions.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use hey_core::{Dom, MemoryDom};
//! use hey_modal::{Environment, ModalFactory, Visibility};
//!
//! let mut dom = MemoryDom::new();
//! dom.append_markup(r#"<div id="terms"><h2 data-hey-title>Terms</h2></div>"#);
//! let trigger = dom.append_markup(r##"<a href="#terms">Read the terms</a>"##)[0];
//!
//! let factory = ModalFactory::with_environment(Rc::new(Environment::new()));
//! let modal = factory.create(&mut dom, trigger, None);
//! assert_eq!(dom.inner_html(modal.nodes().title), "Terms");
//!
//! dom.click(trigger);
//! assert_ne!(modal.state(), Visibility::Closed);
//! ```

pub mod builder;
pub mod config;
pub mod content;
pub mod environment;
pub mod error;
pub mod factory;
pub mod layout;
pub mod lifecycle;
pub mod metrics;

pub use builder::{ConfirmNodes, ModalNodes, USER_CLOSE_MARKER, title_id};
pub use config::{ClassConfig, ClassRole, Labels, ModalConfig, ModalOptions};
pub use content::{Content, ContentSlot, ContentSource, SlotContent};
pub use environment::{Environment, EnvironmentCapabilities, SharedEnvironmentState};
pub use error::ModalError;
pub use factory::{CONFIRM_ATTRIBUTE, ModalFactory, ModalHandle, ModalId, create};
pub use layout::LayoutCorrector;
pub use lifecycle::{CLOSED_EVENT, FocusTrap, Lifecycle, OPENED_EVENT, Visibility};
pub use metrics::measure_scrollbar_width;
