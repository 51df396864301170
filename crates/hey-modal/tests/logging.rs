#![forbid(unsafe_code)]

//! Recoverable errors are logged, never raised.

use std::rc::Rc;

use hey_core::{Dom, MemoryDom};
use hey_modal::{Environment, ModalConfig, ModalError, ModalFactory};
use tracing_test::traced_test;

fn factory() -> ModalFactory {
    ModalFactory::with_environment(Rc::new(Environment::new()))
}

#[test]
#[traced_test]
fn missing_target_is_logged() {
    let mut dom = MemoryDom::new();
    let trigger = dom.append_markup(r##"<a href="#gone">x</a>"##)[0];
    let modal = factory().create(&mut dom, trigger, None);
    assert!(logs_contain("no modal target matches '#gone'"));
    assert!(matches!(
        modal.diagnostics(),
        [ModalError::MissingTarget { .. }]
    ));
    assert!(dom.is_attached(modal.nodes().wrapper));
}

#[test]
#[traced_test]
fn bad_class_configuration_is_logged() {
    let mut dom = MemoryDom::new();
    let trigger = dom.append_markup(r#"<a data-hey-confirm>x</a>"#)[0];
    let config = ModalConfig::from_json(r#"{ "classes": { "header": "oops", "dialog": [1] } }"#)
        .unwrap();
    let modal = factory().create(&mut dom, trigger, Some(&config));
    assert!(logs_contain("invalid class configuration for 'header'"));
    assert!(logs_contain("invalid class configuration for 'dialog'"));
    assert_eq!(modal.diagnostics().len(), 2);
    assert!(dom.has_class(modal.nodes().header, "modal__header"));
}

#[test]
#[traced_test]
fn malformed_target_selector_is_logged() {
    let mut dom = MemoryDom::new();
    let trigger = dom.append_markup(r#"<a data-hey="div[">x</a>"#)[0];
    let modal = factory().create(&mut dom, trigger, None);
    assert!(logs_contain("modal target selector rejected"));
    assert_eq!(modal.target(), None);
}

#[test]
#[traced_test]
fn redundant_open_is_logged() {
    let mut dom = MemoryDom::new();
    let trigger = dom.append_markup(r#"<a data-hey-confirm>x</a>"#)[0];
    let modal = factory().create(&mut dom, trigger, None);
    modal.open(&mut dom);
    dom.click(trigger);
    assert!(logs_contain("open ignored"));
}
