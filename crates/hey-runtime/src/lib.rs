#![forbid(unsafe_code)]

//! Host-agnostic scheduling helpers for hey-modal.
//!
//! - [`Debounce`]: trailing-edge debounce over the host's timers.
//! - [`listen_once`]: a listener that removes itself after its first accepted event.
//! - [`TransitionGate`]: defer a continuation until a CSS transition ends,
//!   or run it synchronously when the host has no transitions.

pub mod debounce;
pub mod once;
pub mod transition;

pub use debounce::Debounce;
pub use once::{OnceListener, listen_once};
pub use transition::{TransitionGate, TransitionWait};
