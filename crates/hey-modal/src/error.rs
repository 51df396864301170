#![forbid(unsafe_code)]

//! Recoverable modal errors.
//!
//! None of these abort construction. They are logged with `tracing::error!`
//! and recorded on the instance, and the modal carries on degraded:
//!
//! | Error | Cause | Fallback |
//! |-------|-------|----------|
//! | `Configuration` | Role value is not a list of class names, or unknown role | Default classes for that role |
//! | `MissingTarget` | Non-confirm trigger names no existing target | Empty content |
//! | `InvalidSelector` | Target selector does not parse | Same as `MissingTarget` |

use std::fmt;

use hey_core::SelectorError;

/// Errors raised while building a modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalError {
    /// A class configuration entry was rejected.
    Configuration { role: String, reason: String },
    /// No target subtree could be resolved for a non-confirm modal.
    MissingTarget { selector: Option<String> },
    /// The trigger's target selector is malformed.
    InvalidSelector(SelectorError),
}

impl fmt::Display for ModalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration { role, reason } => {
                write!(f, "invalid class configuration for '{role}': {reason}")
            }
            Self::MissingTarget { selector: Some(selector) } => {
                write!(f, "no modal target matches '{selector}'")
            }
            Self::MissingTarget { selector: None } => write!(f, "no modal target given"),
            Self::InvalidSelector(err) => write!(f, "modal target selector rejected: {err}"),
        }
    }
}

impl std::error::Error for ModalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidSelector(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SelectorError> for ModalError {
    fn from(err: SelectorError) -> Self {
        Self::InvalidSelector(err)
    }
}
