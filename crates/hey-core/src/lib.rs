#![forbid(unsafe_code)]

//! Host capability surface for hey-modal.
//!
//! The modal never talks to a concrete browser. It drives a [`Dom`]: an
//! object-safe trait covering tree manipulation, attribute/class edits,
//! selector queries, metrics, focus, event publish/subscribe and timers.
//!
//! [`MemoryDom`] is a deterministic, headless implementation with a virtual
//! clock. It backs the test suites and can host modals server-side.

pub mod dom;
pub mod event;
pub mod memory;
pub mod selector;

pub use dom::{Dom, FOCUSABLE_SELECTOR, Listener, ListenerId, NodeId, Task, TimerId};
pub use event::{Event, EventKind, EventTarget, KeyCode, KeyEvent, Modifiers};
pub use memory::{HostProfile, Layout, MemoryDom};
pub use selector::{Selector, SelectorError};
