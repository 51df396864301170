#![forbid(unsafe_code)]

//! heyModal public facade.
//!
//! Re-exports the host capability surface, the scheduling helpers and the
//! modal itself. Most applications only need the [`prelude`].
//!
//! ```
//! use hey::prelude::*;
//!
//! let mut dom = MemoryDom::new();
//! let trigger = dom.append_markup(r#"<a href="/logout" data-hey-confirm>Log out</a>"#)[0];
//! let modal = create(&mut dom, trigger, Some(&ModalConfig::new().title("Log out?")));
//! assert!(modal.is_confirm());
//! ```

pub use hey_core as core;
pub use hey_modal as modal;
pub use hey_runtime as runtime;

pub use hey_core::{Dom, Event, EventKind, EventTarget, KeyCode, MemoryDom, NodeId};
pub use hey_modal::{
    ModalConfig, ModalError, ModalFactory, ModalHandle, ModalId, Visibility, create,
};

pub mod prelude {
    pub use hey_core::{
        Dom, Event, EventKind, EventTarget, HostProfile, KeyCode, Layout, MemoryDom, Modifiers,
        NodeId,
    };
    pub use hey_modal::{
        CLOSED_EVENT, ClassRole, Environment, EnvironmentCapabilities, ModalConfig, ModalError,
        ModalFactory, ModalHandle, ModalId, OPENED_EVENT, Visibility, create,
    };
}
