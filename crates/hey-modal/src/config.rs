#![forbid(unsafe_code)]

//! Modal configuration: class roles, user overrides and their merge.
//!
//! User configuration is deliberately loose ([`ModalConfig`] keeps class
//! values as JSON) so it can come straight from markup or a JSON blob.
//! [`ModalConfig::resolve`] merges it over the defaults and validates it,
//! producing strongly typed [`ModalOptions`] plus any [`ModalError`]s.
//!
//! # Merge rules
//!
//! - A role supplied as an array of strings replaces that role's defaults
//!   wholesale. Other roles keep their defaults.
//! - A role whose value is not an array is rejected; the default stays.
//! - Non-string entries inside an array are rejected; the string entries stay.
//! - Unknown role keys are rejected.
//! - A role set under both its current key and its legacy alias keeps the
//!   current key's value; the alias is rejected.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ModalError;

/// Structural or state role that carries class names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ClassRole {
    Wrapper,
    Dialog,
    Header,
    Body,
    Content,
    CloseButton,
    Title,
    ConfirmContainer,
    ConfirmAccept,
    ConfirmCancel,
    VisibleState,
    ScrollLockState,
}

impl ClassRole {
    pub const COUNT: usize = 12;

    pub const ALL: [ClassRole; Self::COUNT] = [
        Self::Wrapper,
        Self::Dialog,
        Self::Header,
        Self::Body,
        Self::Content,
        Self::CloseButton,
        Self::Title,
        Self::ConfirmContainer,
        Self::ConfirmAccept,
        Self::ConfirmCancel,
        Self::VisibleState,
        Self::ScrollLockState,
    ];

    /// Configuration key, e.g. `close-button`.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Wrapper => "wrapper",
            Self::Dialog => "dialog",
            Self::Header => "header",
            Self::Body => "body",
            Self::Content => "content",
            Self::CloseButton => "close-button",
            Self::Title => "title",
            Self::ConfirmContainer => "confirm-container",
            Self::ConfirmAccept => "confirm-accept",
            Self::ConfirmCancel => "confirm-cancel",
            Self::VisibleState => "visible-state",
            Self::ScrollLockState => "scroll-lock-state",
        }
    }

    /// Older camelCase key accepted as an alias, e.g. `modalClose`.
    pub const fn legacy_key(self) -> &'static str {
        match self {
            Self::Wrapper => "modal",
            Self::Dialog => "modalDialog",
            Self::Header => "modalHeader",
            Self::Body => "modalBody",
            Self::Content => "modalContent",
            Self::CloseButton => "modalClose",
            Self::Title => "modalTitle",
            Self::ConfirmContainer => "confirm",
            Self::ConfirmAccept => "confirmYes",
            Self::ConfirmCancel => "confirmCancel",
            Self::VisibleState => "visibleClass",
            Self::ScrollLockState => "bodyOverflowClass",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|role| role.key() == key || role.legacy_key() == key)
    }

    fn default_tokens(self) -> &'static [&'static str] {
        match self {
            Self::Wrapper => &["modal"],
            Self::Dialog => &["modal__dialog"],
            Self::Header => &["modal__header"],
            Self::Body => &["modal__body"],
            Self::Content => &["modal__content"],
            Self::CloseButton => &["modal__close"],
            Self::Title => &["modal__title"],
            Self::ConfirmContainer => &["modal__confirm"],
            Self::ConfirmAccept => &["btn", "btn--positive"],
            Self::ConfirmCancel => &["btn", "btn--negative"],
            Self::VisibleState => &["modal--is-visible"],
            Self::ScrollLockState => &["modal-body-no-scroll"],
        }
    }

    #[inline]
    const fn index(self) -> usize {
        self as usize
    }
}

/// Class-name tokens for every role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassConfig {
    tokens: [Vec<String>; ClassRole::COUNT],
}

impl Default for ClassConfig {
    fn default() -> Self {
        Self {
            tokens: ClassRole::ALL.map(|role| {
                role.default_tokens()
                    .iter()
                    .map(|t| (*t).to_owned())
                    .collect()
            }),
        }
    }
}

impl ClassConfig {
    /// Tokens for `role`, in order.
    pub fn get(&self, role: ClassRole) -> &[String] {
        &self.tokens[role.index()]
    }

    /// Replace the tokens for `role`.
    pub fn set<I, S>(&mut self, role: ClassRole, tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tokens[role.index()] = tokens.into_iter().map(Into::into).collect();
    }
}

/// Labels rendered into the dialog chrome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    /// `aria-label` of the close button.
    pub close: String,
    /// Markup of the confirm accept control.
    pub accept: String,
    /// Markup of the confirm cancel control.
    pub cancel: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            close: "Close".to_owned(),
            accept: "Proceed".to_owned(),
            cancel: "Cancel".to_owned(),
        }
    }
}

/// Validated, merged options a modal is built from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModalOptions {
    pub classes: ClassConfig,
    pub title: Option<String>,
    pub body: Option<String>,
    pub labels: Labels,
}

/// User-supplied configuration, merged over the defaults.
///
/// ```
/// use hey_modal::{ClassRole, ModalConfig};
///
/// let config = ModalConfig::from_json(r#"{ "classes": { "dialog": ["card"] } }"#).unwrap();
/// let (options, errors) = config.resolve();
/// assert!(errors.is_empty());
/// assert_eq!(options.classes.get(ClassRole::Dialog), ["card"]);
/// assert_eq!(options.classes.get(ClassRole::Header), ["modal__header"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModalConfig {
    /// Role key → list of class names.
    pub classes: BTreeMap<String, Value>,
    /// Explicit title markup; wins over markup found in the document.
    pub title: Option<String>,
    /// Explicit body markup.
    pub body: Option<String>,
    pub close_label: Option<String>,
    pub accept_label: Option<String>,
    pub cancel_label: Option<String>,
}

impl ModalConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Override the classes of one role.
    #[must_use]
    pub fn class<I, S>(mut self, role: ClassRole, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens = tokens
            .into_iter()
            .map(|t| Value::String(t.into()))
            .collect();
        self.classes.insert(role.key().to_owned(), Value::Array(tokens));
        self
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    #[must_use]
    pub fn close_label(mut self, label: impl Into<String>) -> Self {
        self.close_label = Some(label.into());
        self
    }

    #[must_use]
    pub fn accept_label(mut self, label: impl Into<String>) -> Self {
        self.accept_label = Some(label.into());
        self
    }

    #[must_use]
    pub fn cancel_label(mut self, label: impl Into<String>) -> Self {
        self.cancel_label = Some(label.into());
        self
    }

    /// Merge over the defaults. Rejected entries are returned, never fatal.
    pub fn resolve(&self) -> (ModalOptions, Vec<ModalError>) {
        let mut options = ModalOptions::default();
        let mut errors = Vec::new();

        // Current keys before legacy aliases, so they win when both are set.
        let mut entries: Vec<_> = self.classes.iter().collect();
        entries.sort_by_key(|(key, _)| {
            ClassRole::from_key(key).is_some_and(|role| role.key() != key.as_str())
        });
        let mut seen: [Option<&str>; ClassRole::COUNT] = [None; ClassRole::COUNT];

        for (key, value) in entries {
            let Some(role) = ClassRole::from_key(key) else {
                errors.push(ModalError::Configuration {
                    role: key.clone(),
                    reason: "unknown class role".to_owned(),
                });
                continue;
            };
            if let Some(first) = seen[role.index()] {
                errors.push(ModalError::Configuration {
                    role: key.clone(),
                    reason: format!("duplicates '{first}', which takes precedence"),
                });
                continue;
            }
            seen[role.index()] = Some(key.as_str());
            let Value::Array(items) = value else {
                errors.push(ModalError::Configuration {
                    role: key.clone(),
                    reason: format!(
                        "classes must be set as arrays, e.g. {key}: [\"class-one\"], got {value}"
                    ),
                });
                continue;
            };
            let mut tokens = Vec::with_capacity(items.len());
            for item in items {
                match item.as_str() {
                    Some(token) if !token.trim().is_empty() => tokens.push(token.to_owned()),
                    _ => errors.push(ModalError::Configuration {
                        role: key.clone(),
                        reason: format!("class names must be non-empty strings, got {item}"),
                    }),
                }
            }
            options.classes.set(role, tokens);
        }

        options.title = non_empty(&self.title);
        options.body = non_empty(&self.body);
        if let Some(label) = &self.close_label {
            options.labels.close.clone_from(label);
        }
        if let Some(label) = &self.accept_label {
            options.labels.accept.clone_from(label);
        }
        if let Some(label) = &self.cancel_label {
            options.labels.cancel.clone_from(label);
        }
        (options, errors)
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn defaults_cover_every_role() {
        let classes = ClassConfig::default();
        for role in ClassRole::ALL {
            assert!(!classes.get(role).is_empty(), "{role:?} has no default");
        }
        assert_eq!(classes.get(ClassRole::ConfirmAccept), ["btn", "btn--positive"]);
    }

    #[test]
    fn keys_round_trip() {
        for role in ClassRole::ALL {
            assert_eq!(ClassRole::from_key(role.key()), Some(role));
            assert_eq!(ClassRole::from_key(role.legacy_key()), Some(role));
        }
        assert_eq!(ClassRole::from_key("nope"), None);
    }

    #[test]
    fn single_role_override_keeps_other_roles() {
        let (options, errors) = ModalConfig::new()
            .class(ClassRole::Dialog, ["card", "card--wide"])
            .resolve();
        assert!(errors.is_empty());
        assert_eq!(options.classes.get(ClassRole::Dialog), ["card", "card--wide"]);
        assert_eq!(options.classes.get(ClassRole::Header), ["modal__header"]);
    }

    #[test]
    fn override_replaces_rather_than_concatenates() {
        let (options, _) = ModalConfig::new()
            .class(ClassRole::ConfirmAccept, ["go"])
            .resolve();
        assert_eq!(options.classes.get(ClassRole::ConfirmAccept), ["go"]);
    }

    #[test]
    fn legacy_keys_from_json() {
        let config = ModalConfig::from_value(json!({
            "classes": { "modalDialog": ["legacy"], "visibleClass": ["shown"] },
            "title": "Hello",
            "closeLabel": "Dismiss"
        }))
        .unwrap();
        let (options, errors) = config.resolve();
        assert!(errors.is_empty());
        assert_eq!(options.classes.get(ClassRole::Dialog), ["legacy"]);
        assert_eq!(options.classes.get(ClassRole::VisibleState), ["shown"]);
        assert_eq!(options.title.as_deref(), Some("Hello"));
        assert_eq!(options.labels.close, "Dismiss");
        assert_eq!(options.labels.accept, "Proceed");
    }

    #[test]
    fn current_key_wins_over_legacy_alias() {
        let config = ModalConfig::from_value(json!({
            "classes": { "dialog": ["current"], "modalDialog": ["legacy"] }
        }))
        .unwrap();
        let (options, errors) = config.resolve();
        assert_eq!(options.classes.get(ClassRole::Dialog), ["current"]);
        assert_eq!(
            errors,
            vec![ModalError::Configuration {
                role: "modalDialog".into(),
                reason: "duplicates 'dialog', which takes precedence".into()
            }]
        );
    }

    #[test]
    fn invalid_current_key_still_shadows_alias() {
        let config = ModalConfig::from_value(json!({
            "classes": { "visible-state": "shown", "visibleClass": ["legacy"] }
        }))
        .unwrap();
        let (options, errors) = config.resolve();
        assert_eq!(errors.len(), 2);
        assert_eq!(options.classes.get(ClassRole::VisibleState), ["modal--is-visible"]);
    }

    #[test]
    fn non_array_value_is_rejected_and_default_kept() {
        let config = ModalConfig::from_value(json!({
            "classes": { "dialog": "not-an-array", "header": ["h"] }
        }))
        .unwrap();
        let (options, errors) = config.resolve();
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            &errors[0],
            ModalError::Configuration { role, .. } if role == "dialog"
        ));
        assert_eq!(options.classes.get(ClassRole::Dialog), ["modal__dialog"]);
        assert_eq!(options.classes.get(ClassRole::Header), ["h"]);
    }

    #[test]
    fn non_string_entries_dropped_strings_kept() {
        let config = ModalConfig::from_value(json!({
            "classes": { "title": ["a", 3, null, "b", ""] }
        }))
        .unwrap();
        let (options, errors) = config.resolve();
        assert_eq!(errors.len(), 3);
        assert_eq!(options.classes.get(ClassRole::Title), ["a", "b"]);
    }

    #[test]
    fn unknown_role_is_reported() {
        let config = ModalConfig::from_value(json!({ "classes": { "footer": ["f"] } })).unwrap();
        let (options, errors) = config.resolve();
        assert_eq!(options.classes, ClassConfig::default());
        assert_eq!(
            errors,
            vec![ModalError::Configuration {
                role: "footer".into(),
                reason: "unknown class role".into()
            }]
        );
    }

    #[test]
    fn empty_explicit_content_counts_as_absent() {
        let (options, _) = ModalConfig::new().title("").body("<p>x</p>").resolve();
        assert_eq!(options.title, None);
        assert_eq!(options.body.as_deref(), Some("<p>x</p>"));
    }
}
